//! Access to the upstream content API.

mod fetcher;

pub use fetcher::AyahFetcher;

use crate::error::AyahError;
use crate::models::AyahPayload;

/// A source of random verses, served by the `/api/random-ayah` route.
#[async_trait::async_trait]
pub trait AyahSource: Send + Sync {
    async fn random_ayah(&self) -> Result<AyahPayload, AyahError>;
}
