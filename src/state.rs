//! Shared application state.
//!
//! Contains the state that is shared across all request handlers:
//! the configuration and the verse source wired up at startup.

use crate::config::ConfigV1;
use crate::content::AyahSource;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request handler; the token cache lives
/// inside `ayahs` and is shared by every clone.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Upstream verse source, normally an `AyahFetcher` over a `TokenCache`.
    pub ayahs: Arc<dyn AyahSource>,
}
