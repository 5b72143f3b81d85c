//! Recipe Finder web site library.
//!
//! Server-rendered pages, Google sign-in and the session-aware data gate
//! in front of the internal recipe REST API. Exposed as a library so the
//! integration tests can drive it in-process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod gate;
pub mod google;
pub mod media;
pub mod middleware;
pub mod models;
pub mod rest;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};

use config::AppConfig;
use state::AppState;

/// All routes, including health checks, without the session or tracing layers.
///
/// Serve with `into_make_service_with_connect_info::<SocketAddr>()` so the
/// sign-in rate limiter can see the peer address.
pub fn router(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes(config))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
