//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the auth API, the generation proxy, and the health endpoint
//! under a single Axum router. The site's pages are served as static
//! files via the fallback; the session gate wraps everything, but only
//! acts on the `/dashboard` and `/auth` prefixes.

pub mod auth;
pub mod gate;
pub mod health;
pub mod llm;

use std::path::PathBuf;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Resolve the path to the static website directory.
fn website_dir() -> PathBuf {
    std::env::var("WEBSITE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./website"))
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let website = ServeDir::new(website_dir()).append_index_html_on_directories(true);

    Router::new()
        .route("/api/auth/signin/{provider}", post(auth::sign_in_oauth))
        .route("/api/auth/signin", post(auth::sign_in_email))
        .route("/api/auth/signup", post(auth::sign_up))
        .route("/api/auth/reset", post(auth::reset))
        .route("/api/auth/signout", post(auth::sign_out))
        .route("/api/auth/me", get(auth::me))
        .route("/api/llm/generate", post(llm::generate))
        .route("/api/llm/embedding", post(llm::embedding))
        .route("/healthz", get(health::healthz))
        .fallback_service(website)
        .layer(middleware::from_fn_with_state(state.clone(), gate::session_gate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
