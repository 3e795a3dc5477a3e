//! Application startup and server initialization.
//!
//! Builds the dependency graph once (HTTP client, credential exchange,
//! token cache, verse fetcher), hands it to the router and serves it.

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

use crate::auth::{ClientCredentialsExchange, SystemClock, TokenCache};
use crate::config::ConfigV1;
use crate::content::AyahFetcher;
use crate::routes;
use crate::state::AppState;

/// Wires the token cache and verse fetcher for the given configuration.
///
/// Both upstream clients share one connection pool with the configured timeout.
pub fn build_state(config: Arc<ConfigV1>) -> Result<AppState, reqwest::Error> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.upstream.timeout_in_ms))
        .build()?;

    let exchange = Arc::new(ClientCredentialsExchange::new(
        &config.upstream,
        http.clone(),
    ));
    let tokens = Arc::new(TokenCache::new(
        exchange,
        Arc::new(SystemClock),
        config.token.safety_margin(),
    ));
    let fetcher = AyahFetcher::new(&config.upstream, &config.verses, tokens, http);

    Ok(AppState {
        config,
        ayahs: Arc::new(fetcher),
    })
}

/// Initializes and runs the application server.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built, the server fails to
/// bind to the configured address, or serving stops with an I/O error.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(config.clone())?;
    let app = routes::create_router(state);

    let bind_address = config.bind_address();
    let listener = TcpListener::bind(&bind_address).await?;
    info!("Server is running on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
