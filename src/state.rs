//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! Everything in it is fixed at startup: the configuration (mode
//! included), the identity provider client for live mode, the auth
//! backend selected for that mode, the generation client, and the rate
//! limiter. No per-request state is shared across requests.

use std::sync::Arc;

use crate::config::{AppConfig, Mode};
use crate::rate_limit::RateLimiter;
use crate::services::auth::{AuthService, backend_for};
use crate::services::generation::GenerationClient;
use crate::services::provider::ProviderClient;

/// Shared application state. Clone is required by Axum — all inner
/// fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Identity provider client. `None` in demo mode.
    pub provider: Option<Arc<ProviderClient>>,
    /// Auth backend selected once at startup from the mode.
    pub auth: Arc<dyn AuthService>,
    pub generation: GenerationClient,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let provider = match config.mode {
            Mode::Live => Some(Arc::new(ProviderClient::new(
                config.provider_url.clone(),
                config.anon_key.clone(),
            ))),
            Mode::Demo => None,
        };
        let auth = backend_for(config.mode, provider.clone());
        let generation = GenerationClient::new(config.mode, config.api_url.clone());

        Self {
            config: Arc::new(config),
            provider,
            auth,
            generation,
            rate_limiter: RateLimiter::new(),
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
