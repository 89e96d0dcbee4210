use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{SupplyMapError, SupplyMapResult};
use crate::query::SupplyChainEngine;

pub mod handlers;

#[derive(Clone)]
pub struct AppState {
    pub engine: SupplyChainEngine,
}

/// Data endpoints live under `/api`; `/health` stays at the root.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/companies", get(handlers::list_companies))
        .route("/suppliers", get(handlers::list_suppliers))
        .route("/ports", get(handlers::list_ports))
        .route("/supply-chain", post(handlers::supply_chain))
        .route("/impact", post(handlers::impact));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn run_http_server(config: &ServerConfig, engine: SupplyChainEngine) -> SupplyMapResult<()> {
    let app = router(AppState { engine });

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|err| SupplyMapError::Internal(format!("invalid server address: {err}")))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| SupplyMapError::Internal(format!("failed to bind server: {err}")))?;

    info!(%addr, "supply chain API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| SupplyMapError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
