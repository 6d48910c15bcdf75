//! Identity provider REST client.
//!
//! ARCHITECTURE
//! ============
//! Thin HTTP wrapper around a GoTrue-style identity API (`/auth/v1/...`).
//! The provider owns sessions; this client only exchanges credentials for
//! token pairs and resolves tokens back to users. Transport failures and
//! API rejections are distinct variants: the session gate treats only the
//! former as a provider outage.

use serde::Deserialize;

use super::auth::types::{AuthUser, TokenPair};

const AUTH_PATH: &str = "/auth/v1";

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport-level failure (network, DNS, TLS). Feeds the gate's
    /// outage policy.
    #[error("provider request failed: {0}")]
    Transport(String),
    /// The provider answered with a non-success status.
    #[error("provider rejected request: status {status}: {message}")]
    Api { status: u16, message: String },
    /// The provider response body could not be deserialized.
    #[error("provider response parse failed: {0}")]
    Parse(String),
}

impl ProviderError {
    /// True for failures that mean "the provider is unreachable", as
    /// opposed to "the provider said no".
    #[must_use]
    pub fn is_outage(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct ProviderSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: ProviderUser,
}

impl ProviderSession {
    #[must_use]
    pub fn token_pair(&self) -> TokenPair {
        TokenPair {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// Map a provider user record to the facade identity. Display name falls
/// back from metadata to the email local part.
#[must_use]
pub fn to_auth_user(user: ProviderUser) -> AuthUser {
    let email = user.email.unwrap_or_default();
    let name = user
        .user_metadata
        .get("name")
        .or_else(|| user.user_metadata.get("full_name"))
        .and_then(|v| v.as_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| name_from_email(&email));
    AuthUser { id: user.id, email, name }
}

fn name_from_email(email: &str) -> String {
    let local = email
        .split('@')
        .next()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("user");
    local.to_owned()
}

/// Extract a human-readable message from a provider error body. The API
/// answers variously with `error_description`, `msg`, or `message`.
#[must_use]
pub fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v.get("error_description")
                .or_else(|| v.get("msg"))
                .or_else(|| v.get("message"))
        })
        .and_then(|m| m.as_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| body.to_owned())
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct ProviderClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl ProviderClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            anon_key: anon_key.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{AUTH_PATH}{path}", self.base_url)
    }

    /// Build the OAuth authorization URL for a named provider.
    #[must_use]
    pub fn authorize_url(&self, provider: &str, redirect_to: &str) -> String {
        format!(
            "{}?provider={provider}&redirect_to={redirect_to}",
            self.endpoint("/authorize")
        )
    }

    /// Exchange email + password for a session.
    pub async fn password_grant(&self, email: &str, password: &str) -> Result<ProviderSession, ProviderError> {
        self.session_request(
            &format!("{}?grant_type=password", self.endpoint("/token")),
            &serde_json::json!({ "email": email, "password": password }),
            None,
        )
        .await
    }

    /// Exchange a refresh token for a fresh session.
    pub async fn refresh_grant(&self, refresh_token: &str) -> Result<ProviderSession, ProviderError> {
        self.session_request(
            &format!("{}?grant_type=refresh_token", self.endpoint("/token")),
            &serde_json::json!({ "refresh_token": refresh_token }),
            None,
        )
        .await
    }

    /// Register a new user. The provider mails a confirmation link that
    /// lands on `email_redirect_to`.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        email_redirect_to: &str,
    ) -> Result<ProviderUser, ProviderError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "options": { "email_redirect_to": email_redirect_to },
        });
        let text = self.call(&self.endpoint("/signup"), Some(&body), None).await?;
        serde_json::from_str(&text).map_err(|e| ProviderError::Parse(e.to_string()))
    }

    /// Trigger a password-recovery email.
    pub async fn recover(&self, email: &str, redirect_to: &str) -> Result<(), ProviderError> {
        let body = serde_json::json!({ "email": email, "redirect_to": redirect_to });
        self.call(&self.endpoint("/recover"), Some(&body), None).await?;
        Ok(())
    }

    /// Revoke the session behind an access token.
    pub async fn logout(&self, access_token: &str) -> Result<(), ProviderError> {
        self.call(&self.endpoint("/logout"), None, Some(access_token)).await?;
        Ok(())
    }

    /// Resolve an access token to its user.
    pub async fn get_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError> {
        let response = self
            .http
            .get(self.endpoint("/user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(ProviderError::Api { status, message: error_message(&text) });
        }
        serde_json::from_str(&text).map_err(|e| ProviderError::Parse(e.to_string()))
    }

    async fn session_request(
        &self,
        url: &str,
        body: &serde_json::Value,
        bearer: Option<&str>,
    ) -> Result<ProviderSession, ProviderError> {
        let text = self.call(url, Some(body), bearer).await?;
        serde_json::from_str(&text).map_err(|e| ProviderError::Parse(e.to_string()))
    }

    async fn call(
        &self,
        url: &str,
        body: Option<&serde_json::Value>,
        bearer: Option<&str>,
    ) -> Result<String, ProviderError> {
        let mut request = self.http.post(url).header("apikey", &self.anon_key);
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(ProviderError::Api { status, message: error_message(&text) });
        }
        Ok(text)
    }
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;
