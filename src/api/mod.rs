//! REST API for a completed scenario evaluation.
//!
//! Provides two GET endpoints:
//! - `/state`: farm report, field evaluation, and power study
//! - `/turbines`: per-turbine results with optional index range filtering

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::farm::FarmReport;
use crate::layout::LayoutReport;
use crate::power_curve::study::PowerStudy;

/// Immutable application state shared across all request handlers.
///
/// Built once after evaluation and wrapped in `Arc`; nothing mutates it.
pub struct AppState {
    /// Point-model farm evaluation.
    pub farm: FarmReport,
    /// Grid-model layout evaluation.
    pub layout: LayoutReport,
    /// Weibull power study.
    pub study: PowerStudy,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/turbines", get(handlers::get_turbines))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    info!(%addr, "API server listening");
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
