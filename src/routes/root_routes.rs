//! Landing endpoint.

use crate::state::AppState;
use axum::{routing::get, Router};

/// Registers the root route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(greeting))
}

async fn greeting() -> &'static str {
    "Ayah of the day!"
}
