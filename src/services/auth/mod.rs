//! Auth facade — one operation set, two interchangeable backends.
//!
//! DESIGN
//! ======
//! `AuthService` is the seam between route handlers and identity state.
//! The backend is selected exactly once at startup from the configured
//! mode: `DemoAuth` fabricates identity locally, `LiveAuth` delegates to
//! the identity provider. Handlers hold `Arc<dyn AuthService>` and never
//! branch on mode themselves.

pub mod demo;
pub mod live;
pub mod types;

use std::sync::Arc;

use crate::config::Mode;
use crate::services::provider::ProviderClient;
use types::{
    AuthCallback, AuthReply, AuthUser, Credentials, EmptyPayload, OAuthPayload, Subscription, UserPayload,
};

/// Uniform authentication operations across demo and live mode.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Start an OAuth flow with a named provider. The returned `url` is
    /// where the caller should navigate next.
    async fn sign_in_with_oauth(&self, provider: &str, origin: &str) -> AuthReply<OAuthPayload>;

    /// Sign in with email + password.
    async fn sign_in_with_email(&self, email: &str, password: &str) -> AuthReply<UserPayload>;

    /// Register with email + password.
    async fn sign_up_with_email(&self, email: &str, password: &str, origin: &str) -> AuthReply<UserPayload>;

    /// Request a password reset for `email`.
    async fn reset_password(&self, email: &str, origin: &str) -> AuthReply<EmptyPayload>;

    /// End the current session.
    async fn sign_out(&self, creds: &Credentials) -> AuthReply<EmptyPayload>;

    /// Resolve the current user, if any. Plain value, not enveloped.
    async fn current_user(&self, creds: &Credentials) -> Option<AuthUser>;

    /// Subscribe to auth state changes. The callback fires at most once;
    /// unsubscribing the returned handle is a no-op.
    fn on_auth_state_change(&self, creds: &Credentials, callback: AuthCallback) -> Subscription;
}

/// Select the backend for the configured mode. Called once at startup.
#[must_use]
pub fn backend_for(mode: Mode, provider: Option<Arc<ProviderClient>>) -> Arc<dyn AuthService> {
    match (mode, provider) {
        (Mode::Live, Some(provider)) => Arc::new(live::LiveAuth::new(provider)),
        _ => Arc::new(demo::DemoAuth),
    }
}
