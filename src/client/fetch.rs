use std::time::Duration;

use http::StatusCode;
use thiserror::Error;
use tracing::{debug, error};

use crate::models::AyahPayload;

/// Something the display can ask for a random verse.
///
/// `None` means "unavailable", never "empty".
#[async_trait::async_trait]
pub trait AyahFeed: Send + Sync {
    async fn get_random_ayah(&self) -> Option<AyahPayload>;
}

/// Why a client-side fetch produced nothing. Only ever logged.
#[derive(Debug, Error)]
enum ClientFetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server answered {0}")]
    Status(StatusCode),

    #[error("response is not JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// HTTP client for the server's `/api/random-ayah` endpoint.
#[derive(Clone)]
pub struct AyahClient {
    http: reqwest::Client,
    endpoint: String,
}

impl AyahClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, endpoint))
    }

    pub fn with_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    async fn try_fetch(&self) -> Result<AyahPayload, ClientFetchError> {
        let resp = self.http.get(&self.endpoint).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientFetchError::Status(status));
        }
        let bytes = resp.bytes().await?;
        Ok(AyahPayload(serde_json::from_slice(&bytes)?))
    }

    /// Fetches a verse, logging and swallowing any failure.
    pub async fn get_random_ayah(&self) -> Option<AyahPayload> {
        match self.try_fetch().await {
            Ok(ayah) => {
                debug!(verse_key = ayah.verse_key().unwrap_or("unknown"), "fetched ayah");
                Some(ayah)
            }
            Err(e) => {
                error!(endpoint = self.endpoint.as_str(), "Error fetching ayah: {}", e);
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl AyahFeed for AyahClient {
    async fn get_random_ayah(&self) -> Option<AyahPayload> {
        AyahClient::get_random_ayah(self).await
    }
}
