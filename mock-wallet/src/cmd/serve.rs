//! `mock-wallet serve` command — start the wallet HTTP server.
//!
//! Reads TOML configuration, resolves the signer and per-chain transports,
//! then starts an Axum HTTP server with graceful shutdown support.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::http::Method;
use dotenvy::dotenv;
use tower_http::cors;

use mock_wallet::config::load_config;
use mock_wallet::error::Error;
use mock_wallet::routes::{self, AppState};
use mock_wallet::wallet::Wallet;

use crate::signal::Shutdown;
#[cfg(feature = "telemetry")]
use crate::telemetry::Telemetry;

/// Execute the `serve` command.
///
/// # Errors
///
/// Returns an error if configuration loading, signer resolution, or server
/// binding fails.
pub async fn run(config_path: &Path) -> Result<(), Error> {
    // Load .env variables before config env references are resolved
    dotenv().ok();

    let config = load_config(config_path)?;

    #[cfg(feature = "telemetry")]
    let telemetry_layer = Telemetry::new()
        .with_name(env!("CARGO_PKG_NAME"))
        .with_version(env!("CARGO_PKG_VERSION"))
        .with_log_level(config.log_level().unwrap_or("info"))
        .register()
        .http_tracing();

    let signer = config.signer().resolve()?;
    let wallet = Wallet::new(Arc::new(signer), config.transports());
    tracing::info!(
        address = %wallet.address(),
        rpc_overrides = config.chains().len(),
        "mock wallet ready"
    );

    let state = Arc::new(AppState {
        wallet,
        info: config.provider().clone(),
    });

    let http_endpoints = Router::new().merge(routes::routes().with_state(state));
    #[cfg(feature = "telemetry")]
    let http_endpoints = http_endpoints.layer(telemetry_layer);
    let http_endpoints = http_endpoints.layer(
        cors::CorsLayer::new()
            .allow_origin(cors::Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(cors::Any),
    );

    let addr = SocketAddr::new(config.host(), config.port());
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .inspect_err(|e| tracing::error!("Failed to bind to {}: {}", addr, e))
        .map_err(|e| Error::server_with(format!("failed to bind {addr}"), e))?;

    let shutdown = Shutdown::listen().map_err(|e| Error::server_with("signal handler", e))?;
    let token = shutdown.token();
    axum::serve(listener, http_endpoints)
        .with_graceful_shutdown(async move { token.cancelled().await })
        .await
        .map_err(|e| Error::server_with("server error", e))?;

    shutdown.wait().await;
    tracing::info!("mock wallet stopped");
    Ok(())
}
