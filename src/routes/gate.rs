//! Session gate — route protection and mode-based redirects.
//!
//! ARCHITECTURE
//! ============
//! Runs once per request over exactly two path prefixes (`/dashboard`,
//! `/auth`); every other path bypasses the gate. The decision rules are a
//! pure function of (mode, path, session presence) so they can be tested
//! without a router. Live-session resolution may rotate tokens, in which
//! case the refreshed pair is written onto the outgoing response cookies.
//!
//! TRADE-OFFS
//! ==========
//! A provider outage fails open: the request is handled with demo-mode
//! redirect behavior instead of being rejected. `outage_decision` is the
//! single place that policy lives.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use crate::config::Mode;
use crate::routes::auth::{cookie_secure, credentials_from_jar, token_pair_jar};
use crate::services::auth::types::{Credentials, TokenPair};
use crate::services::provider::{ProviderClient, ProviderError};
use crate::state::AppState;

/// Prefix of the protected area. Requires a session in live mode.
pub const PROTECTED_PREFIX: &str = "/dashboard";
/// Prefix of the auth pages (login, signup, callback).
pub const AUTH_PREFIX: &str = "/auth";

const DASHBOARD_URL: &str = "/dashboard";
const HOME_URL: &str = "/";

/// Outcome of the gate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    ToDashboard,
    ToHome,
}

/// Whether the gate applies to this path at all.
#[must_use]
pub fn is_gated(path: &str) -> bool {
    path.starts_with(PROTECTED_PREFIX) || path.starts_with(AUTH_PREFIX)
}

/// The gate rules, in evaluation order.
#[must_use]
pub fn decide(mode: Mode, path: &str, session: bool) -> GateDecision {
    if mode.is_demo() {
        // Auth flows are meaningless without a real provider.
        if path.starts_with(AUTH_PREFIX) {
            return GateDecision::ToDashboard;
        }
        return GateDecision::Pass;
    }
    if path.starts_with(PROTECTED_PREFIX) && !session {
        return GateDecision::ToHome;
    }
    if path.starts_with(AUTH_PREFIX) && session {
        return GateDecision::ToDashboard;
    }
    GateDecision::Pass
}

/// Fail-open policy for identity provider outages: the request is handled
/// with demo-mode behavior, for this request only.
#[must_use]
pub fn outage_decision(path: &str) -> GateDecision {
    decide(Mode::Demo, path, false)
}

// =============================================================================
// LIVE SESSION RESOLUTION
// =============================================================================

/// Result of resolving the request's session cookies against the provider.
#[derive(Debug)]
enum ResolvedSession {
    Absent,
    Valid,
    /// The access token was stale; the provider issued a fresh pair that
    /// must be written back to the client.
    Refreshed(TokenPair),
}

async fn resolve_session(
    provider: &ProviderClient,
    creds: &Credentials,
) -> Result<ResolvedSession, ProviderError> {
    match &creds.access_token {
        Some(token) => match provider.get_user(token).await {
            Ok(_) => Ok(ResolvedSession::Valid),
            Err(e) if e.is_outage() => Err(e),
            Err(_) => try_refresh(provider, creds).await,
        },
        None => try_refresh(provider, creds).await,
    }
}

async fn try_refresh(
    provider: &ProviderClient,
    creds: &Credentials,
) -> Result<ResolvedSession, ProviderError> {
    let Some(refresh_token) = &creds.refresh_token else {
        return Ok(ResolvedSession::Absent);
    };
    match provider.refresh_grant(refresh_token).await {
        Ok(session) => Ok(ResolvedSession::Refreshed(session.token_pair())),
        Err(e) if e.is_outage() => Err(e),
        Err(e) => {
            // The provider said no; that's an expired session, not an outage.
            debug!(error = %e, "session refresh rejected");
            Ok(ResolvedSession::Absent)
        }
    }
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

pub async fn session_gate(State(state): State<AppState>, jar: CookieJar, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    if !is_gated(&path) {
        return next.run(req).await;
    }

    let mode = state.config.mode;
    if mode.is_demo() {
        return apply(decide(mode, &path, false), req, next, None).await;
    }

    let Some(provider) = state.provider.clone() else {
        // Live mode without a provider client cannot happen by
        // construction; treat it as an outage.
        return apply(outage_decision(&path), req, next, None).await;
    };

    let creds = credentials_from_jar(&jar);
    match resolve_session(&provider, &creds).await {
        Ok(ResolvedSession::Valid) => apply(decide(mode, &path, true), req, next, None).await,
        Ok(ResolvedSession::Refreshed(pair)) => {
            let secure = cookie_secure(&state.config.provider_url);
            apply(decide(mode, &path, true), req, next, Some((pair, secure))).await
        }
        Ok(ResolvedSession::Absent) => apply(decide(mode, &path, false), req, next, None).await,
        Err(e) => {
            warn!(error = %e, path, "identity provider unreachable, failing open");
            apply(outage_decision(&path), req, next, None).await
        }
    }
}

async fn apply(
    decision: GateDecision,
    req: Request,
    next: Next,
    refreshed: Option<(TokenPair, bool)>,
) -> Response {
    let response = match decision {
        GateDecision::Pass => next.run(req).await,
        GateDecision::ToDashboard => Redirect::temporary(DASHBOARD_URL).into_response(),
        GateDecision::ToHome => Redirect::temporary(HOME_URL).into_response(),
    };
    match refreshed {
        Some((pair, secure)) => (token_pair_jar(&pair, secure), response).into_response(),
        None => response,
    }
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
