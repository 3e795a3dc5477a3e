//! HTTP route definitions and handlers.
//!
//! The greeting, the random-ayah proxy and the health check each live in
//! their own module and are merged here.

mod ayah_routes;
mod health_routes;
mod root_routes;

use crate::state::AppState;
use axum::Router;

/// Creates the application router with all configured routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(root_routes::routes())
        .merge(ayah_routes::routes())
        .merge(health_routes::routes())
        .with_state(state)
}
