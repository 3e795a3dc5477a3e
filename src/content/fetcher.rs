use std::sync::Arc;

use http::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use super::AyahSource;
use crate::auth::TokenProvider;
use crate::config::{UpstreamConfig, VerseQueryConfig};
use crate::error::{AyahError, UpstreamError};
use crate::models::AyahPayload;

/// Calls the content API's random-verse endpoint with a cached bearer token.
pub struct AyahFetcher {
    http: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    endpoint: String,
    client_id: String,
    query: Vec<(&'static str, String)>,
}

impl AyahFetcher {
    pub fn new(
        upstream: &UpstreamConfig,
        verses: &VerseQueryConfig,
        tokens: Arc<dyn TokenProvider>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            http,
            tokens,
            endpoint: format!(
                "{}/verses/random",
                upstream.api_base_url.trim_end_matches('/')
            ),
            client_id: upstream.client_id.clone(),
            query: verses.to_query(),
        }
    }

    /// Fetches one random verse and returns the body untouched.
    pub async fn fetch_random_ayah(&self) -> Result<AyahPayload, AyahError> {
        let token = self.tokens.token().await?;

        debug!("Requesting random verse from '{}'", self.endpoint);
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&self.query)
            .header("x-auth-token", &token)
            .header("x-client-id", &self.client_id)
            .send()
            .await
            .map_err(UpstreamError::from)?;

        let status = resp.status();
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                self.tokens.invalidate(&token).await;
            }
            let body = resp.text().await.unwrap_or_default();
            warn!(
                event_name = "content.random_verse.failed",
                event_domain = "content",
                status = status.as_u16(),
                "Content API returned an error status"
            );
            return Err(UpstreamError::Status { status, body }.into());
        }

        let bytes = resp.bytes().await.map_err(UpstreamError::from)?;
        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|e| UpstreamError::InvalidBody(e.to_string()))?;

        Ok(AyahPayload(body))
    }
}

#[async_trait::async_trait]
impl AyahSource for AyahFetcher {
    async fn random_ayah(&self) -> Result<AyahPayload, AyahError> {
        self.fetch_random_ayah().await
    }
}
