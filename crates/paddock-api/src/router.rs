//! Route definitions for the Paddock HTTP API.
//!
//! The versioned surface is mounted under `/api/v1`; health lives at
//! `/api/health`. The router receives `AppState` and passes it to all
//! handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    let v1_routes = Router::new()
        .route("/vm", get(handlers::vm::list_pools))
        .route("/vm", post(handlers::vm::checkout))
        .route("/vm/{pools}", post(handlers::vm::checkout_path));

    Router::new()
        .nest("/api/v1", v1_routes)
        .route("/api/health", get(handlers::health::health))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
