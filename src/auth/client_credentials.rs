use tracing::{debug, info};

use super::CredentialExchange;
use crate::config::UpstreamConfig;
use crate::error::AuthError;
use crate::models::IssuedToken;

/// OAuth2 `client_credentials` grant against the configured token endpoint.
pub struct ClientCredentialsExchange {
    http: reqwest::Client,
    auth_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
}

impl ClientCredentialsExchange {
    pub fn new(config: &UpstreamConfig, http: reqwest::Client) -> Self {
        info!(
            "Creating client-credentials exchange for '{}' with scope '{}'",
            config.auth_url, config.scope
        );
        Self {
            http,
            auth_url: config.auth_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.scope.clone(),
        }
    }
}

#[async_trait::async_trait]
impl CredentialExchange for ClientCredentialsExchange {
    async fn exchange(&self) -> Result<IssuedToken, AuthError> {
        debug!("Requesting access token from '{}'", self.auth_url);

        let resp = self
            .http
            .post(&self.auth_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "client_credentials"),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::Rejected { status, body });
        }

        let issued = resp
            .json::<IssuedToken>()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        debug!(
            expires_in = issued.expires_in,
            "Access token exchange completed successfully"
        );
        Ok(issued)
    }
}
