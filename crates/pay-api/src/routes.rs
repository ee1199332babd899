//! # Routes
//!
//! Axum router configuration for the payment API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router
///
/// Routes:
/// - POST    /payment - Process a card payment (raw JSON body)
/// - OPTIONS /payment - CORS preflight
/// - POST    /invoke  - Function-style invocation (event in, envelope out)
/// - GET     /health  - Health check
///
/// CORS headers are part of every envelope, so no CORS layer is installed.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .route(
            "/payment",
            post(handlers::create_payment).options(handlers::preflight),
        )
        .route("/invoke", post(handlers::invoke))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
