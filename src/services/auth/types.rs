//! Auth facade types — envelope, identity, session directives, events.
//!
//! DESIGN
//! ======
//! Every facade operation returns an `AuthResponse` envelope with both a
//! `data` and an `error` key, mirroring the identity provider's result
//! shape. The envelope structure is identical between demo and live mode
//! for each operation, so callers never branch on mode.

use serde::Serialize;
use uuid::Uuid;

/// The reserved demo sign-in address.
pub const DEMO_EMAIL: &str = "demo@vibestack.dev";

/// An authenticated (or fabricated) user identity.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// The single fixed demo identity.
#[must_use]
pub fn demo_user() -> AuthUser {
    AuthUser {
        id: "demo-user-id".to_string(),
        email: DEMO_EMAIL.to_string(),
        name: "Demo User".to_string(),
    }
}

// =============================================================================
// RESULT ENVELOPE
// =============================================================================

/// Structured error carried inside the envelope, never thrown.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuthMessage {
    pub message: String,
}

/// The `{data, error}` result envelope shared by both modes.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse<T> {
    pub data: Option<T>,
    pub error: Option<AuthMessage>,
}

impl<T> AuthResponse<T> {
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self { data: Some(data), error: None }
    }

    #[must_use]
    pub fn err(message: impl Into<String>) -> Self {
        Self { data: None, error: Some(AuthMessage { message: message.into() }) }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Payload for email sign-in/sign-up results.
#[derive(Debug, Clone, Serialize)]
pub struct UserPayload {
    pub user: AuthUser,
}

/// Payload for OAuth sign-in results.
#[derive(Debug, Clone, Serialize)]
pub struct OAuthPayload {
    pub provider: String,
    pub url: String,
}

/// Payload for operations that return no data (reset, sign-out).
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmptyPayload {}

// =============================================================================
// REQUEST CREDENTIALS AND SESSION DIRECTIVES
// =============================================================================

/// Credentials extracted from the incoming request's cookies.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Presence of the demo login flag cookie.
    pub demo_signed_in: bool,
    /// Live-session access token, if any.
    pub access_token: Option<String>,
    /// Live-session refresh token, if any.
    pub refresh_token: Option<String>,
}

/// Live-session token pair owned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Cookie mutation the route layer must apply after a facade call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    None,
    /// Set the demo login flag.
    SignInDemo,
    /// Clear the demo login flag.
    SignOutDemo,
    /// Store a live-session token pair.
    StoreTokens(TokenPair),
    /// Clear the live-session cookies.
    ClearTokens,
}

/// A facade result: the wire envelope plus the session directive.
#[derive(Debug, Clone)]
pub struct AuthReply<T> {
    pub response: AuthResponse<T>,
    pub session: SessionUpdate,
}

impl<T> AuthReply<T> {
    #[must_use]
    pub fn new(response: AuthResponse<T>, session: SessionUpdate) -> Self {
        Self { response, session }
    }
}

// =============================================================================
// AUTH-STATE SUBSCRIPTION
// =============================================================================

/// Auth state change events delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    UserUpdated,
}

/// Callback invoked on auth state changes.
pub type AuthCallback = Box<dyn Fn(AuthEvent, Option<AuthUser>) + Send + Sync + 'static>;

/// Handle returned by `on_auth_state_change`. Unsubscribing is a no-op:
/// subscriptions fire at most once and never outlive their event.
#[derive(Debug)]
pub struct Subscription {
    pub id: Uuid,
}

impl Subscription {
    #[must_use]
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    pub fn unsubscribe(self) {}
}

impl Default for Subscription {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
