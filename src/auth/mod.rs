//! Bearer token acquisition for the content API.
//!
//! A [`TokenCache`] keeps the current token and asks a [`CredentialExchange`]
//! for a new one when it expires. Consumers only see the [`TokenProvider`] seam.

mod client_credentials;
mod clock;
mod token_cache;

pub use client_credentials::ClientCredentialsExchange;
pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub(crate) use clock::ManualClock;
pub use token_cache::TokenCache;

use crate::error::AuthError;
use crate::models::IssuedToken;

/// Trades configured client credentials for a freshly issued token.
#[async_trait::async_trait]
pub trait CredentialExchange: Send + Sync {
    async fn exchange(&self) -> Result<IssuedToken, AuthError>;
}

/// Anything that can hand out a currently valid bearer token.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Result<String, AuthError>;

    /// Reports that upstream refused `rejected`.
    async fn invalidate(&self, rejected: &str);
}
