//! Process configuration and demo/live mode detection.
//!
//! DESIGN
//! ======
//! All environment configuration is read once at startup into `AppConfig`
//! and handed to collaborators by reference. `detect_mode` is the single
//! implementation of the mode formula: live mode requires the demo
//! override to be off AND both the identity provider URL and anon key to
//! be non-empty. Anything else runs in demo mode.

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Operating mode, fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No real identity provider; auth state is local and fabricated.
    Demo,
    /// Backed by a real identity/session provider.
    Live,
}

impl Mode {
    #[must_use]
    pub fn is_demo(self) -> bool {
        matches!(self, Self::Demo)
    }
}

/// Application configuration, loaded once from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode: Mode,
    /// Identity provider base URL. Empty in demo mode.
    pub provider_url: String,
    /// Identity provider public (anon) key. Empty in demo mode.
    pub anon_key: String,
    /// Generation backend base URL.
    pub api_url: String,
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Never fails: missing identity provider credentials downgrade the
    /// process to demo mode rather than erroring.
    ///
    /// - `AUTH_URL`: identity provider base URL
    /// - `AUTH_ANON_KEY`: identity provider anon key
    /// - `DEMO_MODE`: explicit demo override (`1/true/yes/on`)
    /// - `API_URL`: generation backend base URL (default `http://localhost:8000`)
    /// - `PORT`: listen port (default 3000)
    #[must_use]
    pub fn from_env() -> Self {
        let provider_url = env_string("AUTH_URL");
        let anon_key = env_string("AUTH_ANON_KEY");
        let demo_override = env_bool("DEMO_MODE").unwrap_or(false);
        let mode = detect_mode(demo_override, &provider_url, &anon_key);

        let api_url = std::env::var("API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            mode,
            provider_url: provider_url.trim_end_matches('/').to_string(),
            anon_key,
            api_url,
            port: env_parse("PORT", DEFAULT_PORT),
        }
    }
}

/// The mode formula. Live requires override off and both credentials present.
#[must_use]
pub fn detect_mode(demo_override: bool, provider_url: &str, anon_key: &str) -> Mode {
    if demo_override || provider_url.is_empty() || anon_key.is_empty() {
        Mode::Demo
    } else {
        Mode::Live
    }
}

fn env_string(key: &str) -> String {
    std::env::var(key).unwrap_or_default().trim().to_string()
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
