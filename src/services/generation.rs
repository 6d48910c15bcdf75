//! Generation backend client — the proxy's outbound half.
//!
//! DESIGN
//! ======
//! Demo mode talks to the backend's unauthenticated `/api/llm/demo`
//! endpoint and reshapes its reply into the live contract, synthesizing
//! plausible token counts. Live mode forwards to `/api/llm/generate` and
//! `/api/llm/embedding` with a bearer token.
//!
//! TRADE-OFFS
//! ==========
//! Demo-path failures of any kind collapse into a canned, reassuring
//! response rather than an error. The demo experience never breaks; it
//! also never reports that the backend is down.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Mode;
use crate::services::auth::types::Credentials;

/// Bearer token presented on live endpoints while in demo mode.
pub const DEMO_TOKEN: &str = "demo-token";

/// Canned reply used when the demo path cannot reach the backend.
pub const DEMO_FALLBACK_TEXT: &str =
    "Demo mode is working! This shows how AI integration works in the Vibe Stack.";
pub const DEMO_MODEL: &str = "demo";

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Transport-level failure reaching the backend.
    #[error("generation request failed: {0}")]
    Request(String),
    /// The backend answered with a non-success status.
    #[error("generation backend error: status {status}: {detail}")]
    Backend { status: u16, detail: String },
    /// The backend response body could not be deserialized.
    #[error("generation response parse failed: {0}")]
    Parse(String),
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextGenerationRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: Option<u64>,
    pub total_tokens: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextGenerationResponse {
    pub text: String,
    pub model: String,
    pub usage: Usage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    pub embedding: Vec<f32>,
    pub model: String,
    pub usage: Usage,
}

/// Reply shape of the backend's demo endpoint.
#[derive(Debug, Deserialize)]
struct DemoReply {
    content: String,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    demo: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct DemoRequest<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

/// Error body shape of the backend (`{"detail": ...}`).
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

// =============================================================================
// PURE TRANSFORMS
// =============================================================================

/// Synthesize plausible non-negative token counts for demo replies.
fn synth_usage() -> Usage {
    let mut rng = rand::rng();
    Usage {
        prompt_tokens: rng.random_range(10..60),
        completion_tokens: Some(rng.random_range(20..120)),
        total_tokens: rng.random_range(30..180),
    }
}

fn from_demo_reply(reply: DemoReply) -> TextGenerationResponse {
    TextGenerationResponse {
        text: reply.content,
        model: reply.model.unwrap_or_else(|| DEMO_MODEL.to_string()),
        usage: synth_usage(),
    }
}

/// The static response substituted for any demo-path failure.
#[must_use]
pub fn demo_fallback() -> TextGenerationResponse {
    TextGenerationResponse {
        text: DEMO_FALLBACK_TEXT.to_string(),
        model: DEMO_MODEL.to_string(),
        usage: synth_usage(),
    }
}

fn backend_detail(status: u16, body: &str) -> GenerationError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .unwrap_or_else(|| format!("API request failed with status {status}"));
    GenerationError::Backend { status, detail }
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone)]
pub struct GenerationClient {
    http: reqwest::Client,
    api_url: String,
    mode: Mode,
}

impl GenerationClient {
    #[must_use]
    pub fn new(mode: Mode, api_url: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), api_url: api_url.into(), mode }
    }

    /// Resolve the bearer token for backend calls: the literal demo token
    /// in demo mode, the session access token in live mode.
    #[must_use]
    pub fn auth_token(&self, creds: &Credentials) -> Option<String> {
        match self.mode {
            Mode::Demo => Some(DEMO_TOKEN.to_string()),
            Mode::Live => creds.access_token.clone(),
        }
    }

    /// Proxy a text-generation request.
    ///
    /// # Errors
    ///
    /// Live mode surfaces backend and transport failures. The demo path
    /// never fails; see `demo_fallback`.
    pub async fn generate(
        &self,
        token: &str,
        request: &TextGenerationRequest,
    ) -> Result<TextGenerationResponse, GenerationError> {
        match self.mode {
            Mode::Demo => Ok(self.demo_generate(request).await),
            Mode::Live => self.live_generate(token, request).await,
        }
    }

    async fn demo_generate(&self, request: &TextGenerationRequest) -> TextGenerationResponse {
        let body = DemoRequest { prompt: &request.prompt, model: request.model.as_deref() };
        let url = format!("{}/api/llm/demo", self.api_url);

        let reply: Result<DemoReply, String> = async {
            let response = self
                .http
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if !response.status().is_success() {
                return Err(format!("status {}", response.status().as_u16()));
            }
            response.json::<DemoReply>().await.map_err(|e| e.to_string())
        }
        .await;

        match reply {
            Ok(reply) => {
                tracing::debug!(demo = reply.demo, message = reply.message.as_deref(), "demo generation reply");
                from_demo_reply(reply)
            }
            Err(e) => {
                tracing::warn!(error = %e, "demo generation failed, serving canned reply");
                demo_fallback()
            }
        }
    }

    async fn live_generate(
        &self,
        token: &str,
        request: &TextGenerationRequest,
    ) -> Result<TextGenerationResponse, GenerationError> {
        let url = format!("{}/api/llm/generate", self.api_url);
        let text = self.live_call(&url, token, request).await?;
        serde_json::from_str(&text).map_err(|e| GenerationError::Parse(e.to_string()))
    }

    /// Proxy an embedding request. Both modes hit the live endpoint; demo
    /// mode arrives there with the demo token.
    pub async fn embedding(
        &self,
        token: &str,
        request: &EmbeddingRequest,
    ) -> Result<EmbeddingResponse, GenerationError> {
        let url = format!("{}/api/llm/embedding", self.api_url);
        let text = self.live_call(&url, token, request).await?;
        serde_json::from_str(&text).map_err(|e| GenerationError::Parse(e.to_string()))
    }

    async fn live_call<B: Serialize>(&self, url: &str, token: &str, body: &B) -> Result<String, GenerationError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(backend_detail(status, &text));
        }
        Ok(text)
    }
}

#[cfg(test)]
#[path = "generation_test.rs"]
mod tests;
