//! Identity-provider client.
//!
//! Authentication is fully delegated: the browser signs in against the
//! identity provider and hands the storefront a session token, which this
//! client exchanges for the verified user identity. No credentials are
//! stored locally.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use greenbasket_core::UserId;

use crate::config::IdentityConfig;

/// Errors that can occur when verifying identity tokens.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The token was rejected by the provider.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The provider returned an unexpected status.
    #[error("identity provider error (status {status})")]
    Provider { status: u16 },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A verified user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    #[serde(rename = "userId")]
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Client for the identity provider.
#[derive(Clone)]
pub struct IdentityClient {
    inner: Arc<IdentityClientInner>,
}

struct IdentityClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct VerifyTokenRequest<'a> {
    token: &'a str,
}

impl IdentityClient {
    /// Create a new identity-provider client.
    #[must_use]
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            inner: Arc::new(IdentityClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                api_key: config.api_key.expose_secret().to_string(),
            }),
        }
    }

    /// Exchange a client session token for the verified user identity.
    ///
    /// # Errors
    ///
    /// Returns `InvalidToken` when the provider rejects the token, or
    /// another [`IdentityError`] on transport and parse failures.
    #[instrument(skip(self, token))]
    pub async fn verify_token(&self, token: &str) -> Result<AuthUser, IdentityError> {
        let response = self
            .inner
            .client
            .post(format!("{}/v1/sessions/verify", self.inner.base_url))
            .header("X-Api-Key", &self.inner.api_key)
            .json(&VerifyTokenRequest { token })
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(IdentityError::InvalidToken);
        }
        if !status.is_success() {
            tracing::error!(status = %status, "Identity provider returned non-success status");
            return Err(IdentityError::Provider {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
