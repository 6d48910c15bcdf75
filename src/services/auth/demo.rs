//! Demo auth backend — local, fabricated identity.
//!
//! The whole "session" is one flag cookie. Validation failures come back
//! as error envelopes with fixed hint messages, never as errors at the
//! call boundary.

use std::time::Duration;

use super::AuthService;
use super::types::{
    AuthCallback, AuthEvent, AuthReply, AuthResponse, AuthUser, Credentials, DEMO_EMAIL, EmptyPayload,
    OAuthPayload, SessionUpdate, Subscription, UserPayload, demo_user,
};

/// Cookie key holding the demo login flag. Value is `"true"` or absent.
pub const DEMO_FLAG_COOKIE: &str = "demo-user-logged-in";

/// Minimum accepted password length for non-reserved addresses.
pub const MIN_PASSWORD_CHARS: usize = 6;

pub const SIGNIN_HINT: &str = "Demo mode: Use demo@vibestack.dev or any email with 6+ char password";
pub const SIGNUP_HINT: &str = "Demo mode: Password must be at least 6 characters";

/// Delay before the synthetic signed-in event fires.
const STATE_EVENT_DELAY: Duration = Duration::from_millis(100);

/// After sign-in the demo flow lands on the dashboard; auth routes are
/// redirected there by the gate anyway.
const POST_SIGNIN_URL: &str = "/dashboard";

pub struct DemoAuth;

/// The demo identity with the email overridden to the supplied value.
fn user_as(email: &str) -> AuthUser {
    AuthUser { email: email.to_string(), ..demo_user() }
}

#[async_trait::async_trait]
impl AuthService for DemoAuth {
    async fn sign_in_with_oauth(&self, provider: &str, _origin: &str) -> AuthReply<OAuthPayload> {
        AuthReply::new(
            AuthResponse::ok(OAuthPayload { provider: provider.to_string(), url: POST_SIGNIN_URL.to_string() }),
            SessionUpdate::SignInDemo,
        )
    }

    async fn sign_in_with_email(&self, email: &str, password: &str) -> AuthReply<UserPayload> {
        if email == DEMO_EMAIL || password.chars().count() >= MIN_PASSWORD_CHARS {
            AuthReply::new(
                AuthResponse::ok(UserPayload { user: user_as(email) }),
                SessionUpdate::SignInDemo,
            )
        } else {
            AuthReply::new(AuthResponse::err(SIGNIN_HINT), SessionUpdate::None)
        }
    }

    async fn sign_up_with_email(&self, email: &str, password: &str, _origin: &str) -> AuthReply<UserPayload> {
        if password.chars().count() >= MIN_PASSWORD_CHARS {
            AuthReply::new(
                AuthResponse::ok(UserPayload { user: user_as(email) }),
                SessionUpdate::SignInDemo,
            )
        } else {
            AuthReply::new(AuthResponse::err(SIGNUP_HINT), SessionUpdate::None)
        }
    }

    async fn reset_password(&self, _email: &str, _origin: &str) -> AuthReply<EmptyPayload> {
        // No email is sent; the operation trivially succeeds.
        AuthReply::new(AuthResponse::ok(EmptyPayload::default()), SessionUpdate::None)
    }

    async fn sign_out(&self, _creds: &Credentials) -> AuthReply<EmptyPayload> {
        AuthReply::new(AuthResponse::ok(EmptyPayload::default()), SessionUpdate::SignOutDemo)
    }

    async fn current_user(&self, creds: &Credentials) -> Option<AuthUser> {
        creds.demo_signed_in.then(demo_user)
    }

    fn on_auth_state_change(&self, _creds: &Credentials, callback: AuthCallback) -> Subscription {
        // One synthetic signed-in event after a short scheduling delay,
        // then silence.
        tokio::spawn(async move {
            tokio::time::sleep(STATE_EVENT_DELAY).await;
            callback(AuthEvent::SignedIn, Some(demo_user()));
        });
        Subscription::new()
    }
}

#[cfg(test)]
#[path = "demo_test.rs"]
mod tests;
