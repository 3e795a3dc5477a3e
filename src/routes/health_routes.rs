//! Health check endpoints.

use crate::state::AppState;
use axum::{routing::get, Router};

/// Registers health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Returns 200 while the process is serving; upstream reachability is not probed.
async fn health_check() -> &'static str {
    "OK"
}
