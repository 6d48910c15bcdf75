//! Generation proxy routes.
//!
//! `POST /api/llm/generate` and `POST /api/llm/embedding` forward to the
//! external generation backend. Error bodies use the backend's
//! `{"detail": ...}` convention so clients see one shape end to end.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use crate::routes::auth::credentials_from_jar;
use crate::services::generation::{EmbeddingRequest, GenerationError, TextGenerationRequest};
use crate::state::AppState;

fn detail_response(status: StatusCode, detail: &str) -> Response {
    (status, Json(serde_json::json!({ "detail": detail }))).into_response()
}

fn generation_error_response(error: &GenerationError) -> Response {
    match error {
        GenerationError::Backend { status, detail } => detail_response(
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            detail,
        ),
        GenerationError::Request(_) | GenerationError::Parse(_) => {
            warn!(error = %error, "generation backend call failed");
            detail_response(StatusCode::BAD_GATEWAY, &error.to_string())
        }
    }
}

/// `POST /api/llm/generate` — proxy a text-generation request.
pub async fn generate(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<TextGenerationRequest>,
) -> Response {
    let creds = credentials_from_jar(&jar);
    let Some(token) = state.generation.auth_token(&creds) else {
        return detail_response(StatusCode::UNAUTHORIZED, "Authentication required");
    };

    if let Err(e) = state.rate_limiter.check_and_record(&token) {
        return detail_response(StatusCode::TOO_MANY_REQUESTS, &e.to_string());
    }

    match state.generation.generate(&token, &request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => generation_error_response(&e),
    }
}

/// `POST /api/llm/embedding` — proxy an embedding request.
pub async fn embedding(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<EmbeddingRequest>,
) -> Response {
    let creds = credentials_from_jar(&jar);
    let Some(token) = state.generation.auth_token(&creds) else {
        return detail_response(StatusCode::UNAUTHORIZED, "Authentication required");
    };

    if let Err(e) = state.rate_limiter.check_and_record(&token) {
        return detail_response(StatusCode::TOO_MANY_REQUESTS, &e.to_string());
    }

    match state.generation.embedding(&token, &request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => generation_error_response(&e),
    }
}

#[cfg(test)]
#[path = "llm_test.rs"]
mod tests;
