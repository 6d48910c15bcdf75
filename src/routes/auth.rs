//! Auth routes — the HTTP surface of the auth facade.
//!
//! Handlers translate facade replies into JSON bodies and cookie
//! mutations. The facade itself never touches cookies.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::http::header::HOST;
use axum::response::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;

use crate::config::env_bool;
use crate::services::auth::demo::DEMO_FLAG_COOKIE;
use crate::services::auth::types::{
    AuthResponse, AuthUser, Credentials, EmptyPayload, OAuthPayload, SessionUpdate, TokenPair, UserPayload,
};
use crate::state::AppState;

/// Live-session cookies, owned by the identity provider.
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";
pub const REFRESH_TOKEN_COOKIE: &str = "sb-refresh-token";

pub(crate) fn cookie_secure(provider_url: &str) -> bool {
    if let Some(value) = env_bool("COOKIE_SECURE") {
        return value;
    }
    provider_url.starts_with("https://")
}

/// Origin of the incoming request, for OAuth/reset redirect targets.
pub(crate) fn request_origin(headers: &HeaderMap) -> String {
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost:3000");
    format!("{proto}://{host}")
}

// =============================================================================
// COOKIE PLUMBING
// =============================================================================

/// Read the request's auth credentials out of its cookies.
#[must_use]
pub fn credentials_from_jar(jar: &CookieJar) -> Credentials {
    Credentials {
        demo_signed_in: jar.get(DEMO_FLAG_COOKIE).map(Cookie::value) == Some("true"),
        access_token: jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_owned()),
        refresh_token: jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_owned()),
    }
}

fn base_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

fn removal_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(name, String::new(), secure);
    cookie.set_max_age(Duration::ZERO);
    cookie
}

fn token_cookie(name: &'static str, value: &str, secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(name, value.to_owned(), secure);
    cookie.set_http_only(true);
    cookie
}

/// Fresh jar carrying a live-session token pair. Also used by the gate
/// when a session refresh must be written back.
#[must_use]
pub fn token_pair_jar(pair: &TokenPair, secure: bool) -> CookieJar {
    CookieJar::new()
        .add(token_cookie(ACCESS_TOKEN_COOKIE, &pair.access_token, secure))
        .add(token_cookie(REFRESH_TOKEN_COOKIE, &pair.refresh_token, secure))
}

/// Translate a facade session directive into response cookies.
///
/// The demo flag cookie is not HttpOnly: page scripts read it as
/// client-visible session state.
#[must_use]
pub fn session_update_jar(update: &SessionUpdate, secure: bool) -> CookieJar {
    let jar = CookieJar::new();
    match update {
        SessionUpdate::None => jar,
        SessionUpdate::SignInDemo => jar.add(base_cookie(DEMO_FLAG_COOKIE, "true".to_owned(), secure)),
        SessionUpdate::SignOutDemo => jar.add(removal_cookie(DEMO_FLAG_COOKIE, secure)),
        SessionUpdate::StoreTokens(pair) => {
            return token_pair_jar(pair, secure);
        }
        SessionUpdate::ClearTokens => jar
            .add(removal_cookie(ACCESS_TOKEN_COOKIE, secure))
            .add(removal_cookie(REFRESH_TOKEN_COOKIE, secure)),
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct EmailCredentialsBody {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ResetBody {
    pub email: String,
}

/// `POST /api/auth/signin/{provider}` — start an OAuth flow.
pub async fn sign_in_oauth(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
) -> (CookieJar, Json<AuthResponse<OAuthPayload>>) {
    let origin = request_origin(&headers);
    let reply = state.auth.sign_in_with_oauth(&provider, &origin).await;
    let jar = session_update_jar(&reply.session, cookie_secure(&state.config.provider_url));
    (jar, Json(reply.response))
}

/// `POST /api/auth/signin` — email + password sign-in.
pub async fn sign_in_email(
    State(state): State<AppState>,
    Json(body): Json<EmailCredentialsBody>,
) -> (CookieJar, Json<AuthResponse<UserPayload>>) {
    let reply = state.auth.sign_in_with_email(&body.email, &body.password).await;
    let jar = session_update_jar(&reply.session, cookie_secure(&state.config.provider_url));
    (jar, Json(reply.response))
}

/// `POST /api/auth/signup` — email + password registration.
pub async fn sign_up(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<EmailCredentialsBody>,
) -> (CookieJar, Json<AuthResponse<UserPayload>>) {
    let origin = request_origin(&headers);
    let reply = state.auth.sign_up_with_email(&body.email, &body.password, &origin).await;
    let jar = session_update_jar(&reply.session, cookie_secure(&state.config.provider_url));
    (jar, Json(reply.response))
}

/// `POST /api/auth/reset` — request a password reset.
pub async fn reset(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ResetBody>,
) -> Json<AuthResponse<EmptyPayload>> {
    let origin = request_origin(&headers);
    let reply = state.auth.reset_password(&body.email, &origin).await;
    Json(reply.response)
}

/// `POST /api/auth/signout` — end the current session.
pub async fn sign_out(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<AuthResponse<EmptyPayload>>) {
    let creds = credentials_from_jar(&jar);
    let reply = state.auth.sign_out(&creds).await;
    let jar = session_update_jar(&reply.session, cookie_secure(&state.config.provider_url));
    (jar, Json(reply.response))
}

/// `GET /api/auth/me` — current user, or null.
pub async fn me(State(state): State<AppState>, jar: CookieJar) -> Json<Option<AuthUser>> {
    let creds = credentials_from_jar(&jar);
    Json(state.auth.current_user(&creds).await)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
