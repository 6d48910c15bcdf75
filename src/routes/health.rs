//! Health/status endpoint.

use axum::extract::State;
use axum::response::Json;

use crate::state::AppState;

/// `GET /healthz` — service status and feature availability.
pub async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    let demo_mode = state.config.mode.is_demo();
    Json(serde_json::json!({
        "status": "online",
        "version": env!("CARGO_PKG_VERSION"),
        "demo_mode": demo_mode,
        "features": {
            "auth": !demo_mode,
            "rate_limiting": true,
        },
    }))
}
