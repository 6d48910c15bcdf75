//! Live auth backend — delegation to the identity provider.
//!
//! Provider rejections pass through as error envelopes with the
//! provider's own message; the envelope structure matches the demo
//! backend exactly.

use std::sync::Arc;

use tracing::warn;

use super::AuthService;
use super::types::{
    AuthCallback, AuthEvent, AuthReply, AuthResponse, AuthUser, Credentials, EmptyPayload, OAuthPayload,
    SessionUpdate, Subscription, UserPayload,
};
use crate::services::provider::{ProviderClient, to_auth_user};

/// Fixed callback path appended to the request origin for OAuth and
/// signup confirmation redirects.
pub const AUTH_CALLBACK_PATH: &str = "/auth/callback";
/// Redirect target for password-recovery links.
pub const RESET_PASSWORD_PATH: &str = "/auth/reset-password";

pub struct LiveAuth {
    provider: Arc<ProviderClient>,
}

impl LiveAuth {
    #[must_use]
    pub fn new(provider: Arc<ProviderClient>) -> Self {
        Self { provider }
    }
}

#[async_trait::async_trait]
impl AuthService for LiveAuth {
    async fn sign_in_with_oauth(&self, provider: &str, origin: &str) -> AuthReply<OAuthPayload> {
        let redirect_to = format!("{origin}{AUTH_CALLBACK_PATH}");
        let url = self.provider.authorize_url(provider, &redirect_to);
        AuthReply::new(
            AuthResponse::ok(OAuthPayload { provider: provider.to_string(), url }),
            SessionUpdate::None,
        )
    }

    async fn sign_in_with_email(&self, email: &str, password: &str) -> AuthReply<UserPayload> {
        match self.provider.password_grant(email, password).await {
            Ok(session) => {
                let pair = session.token_pair();
                AuthReply::new(
                    AuthResponse::ok(UserPayload { user: to_auth_user(session.user) }),
                    SessionUpdate::StoreTokens(pair),
                )
            }
            Err(e) => {
                warn!(error = %e, "password sign-in rejected");
                AuthReply::new(AuthResponse::err(e.to_string()), SessionUpdate::None)
            }
        }
    }

    async fn sign_up_with_email(&self, email: &str, password: &str, origin: &str) -> AuthReply<UserPayload> {
        let email_redirect_to = format!("{origin}{AUTH_CALLBACK_PATH}");
        match self.provider.sign_up(email, password, &email_redirect_to).await {
            Ok(user) => AuthReply::new(
                AuthResponse::ok(UserPayload { user: to_auth_user(user) }),
                SessionUpdate::None,
            ),
            Err(e) => {
                warn!(error = %e, "sign-up rejected");
                AuthReply::new(AuthResponse::err(e.to_string()), SessionUpdate::None)
            }
        }
    }

    async fn reset_password(&self, email: &str, origin: &str) -> AuthReply<EmptyPayload> {
        let redirect_to = format!("{origin}{RESET_PASSWORD_PATH}");
        match self.provider.recover(email, &redirect_to).await {
            Ok(()) => AuthReply::new(AuthResponse::ok(EmptyPayload::default()), SessionUpdate::None),
            Err(e) => {
                warn!(error = %e, "password reset rejected");
                AuthReply::new(AuthResponse::err(e.to_string()), SessionUpdate::None)
            }
        }
    }

    async fn sign_out(&self, creds: &Credentials) -> AuthReply<EmptyPayload> {
        if let Some(token) = &creds.access_token {
            if let Err(e) = self.provider.logout(token).await {
                // Cookies are cleared regardless; the provider session
                // expires on its own.
                warn!(error = %e, "provider logout failed");
            }
        }
        AuthReply::new(AuthResponse::ok(EmptyPayload::default()), SessionUpdate::ClearTokens)
    }

    async fn current_user(&self, creds: &Credentials) -> Option<AuthUser> {
        let token = creds.access_token.as_deref()?;
        match self.provider.get_user(token).await {
            Ok(user) => Some(to_auth_user(user)),
            Err(e) => {
                warn!(error = %e, "user lookup failed");
                None
            }
        }
    }

    fn on_auth_state_change(&self, creds: &Credentials, callback: AuthCallback) -> Subscription {
        // One lookup, one event. The provider has no server-side change
        // feed to subscribe to.
        let provider = self.provider.clone();
        let token = creds.access_token.clone();
        tokio::spawn(async move {
            let user = match token {
                Some(token) => provider.get_user(&token).await.ok().map(to_auth_user),
                None => None,
            };
            match user {
                Some(user) => callback(AuthEvent::SignedIn, Some(user)),
                None => callback(AuthEvent::SignedOut, None),
            }
        });
        Subscription::new()
    }
}
