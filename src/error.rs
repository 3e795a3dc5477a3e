//! Error types for the token exchange and the content API.

use http::StatusCode;
use thiserror::Error;

/// No valid token could be obtained from the authorization server.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token endpoint unreachable: {0}")]
    Transport(String),

    #[error("token endpoint rejected credentials ({status}): {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("invalid token response: {0}")]
    InvalidResponse(String),
}

/// The content API call failed or answered with an error status.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("content API unreachable: {0}")]
    Transport(String),

    #[error("content API timed out")]
    Timeout,

    #[error("content API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("content API returned an unreadable body: {0}")]
    InvalidBody(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

/// Anything that can go wrong while fetching a random ayah.
#[derive(Debug, Error)]
pub enum AyahError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl AyahError {
    /// Stable machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AyahError::Auth(_) => "auth_failed",
            AyahError::Upstream(UpstreamError::Timeout) => "upstream_timeout",
            AyahError::Upstream(_) => "upstream_failed",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AyahError::Upstream(UpstreamError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}
