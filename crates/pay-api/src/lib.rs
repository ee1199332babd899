//! # pay-api
//!
//! Payment request handler for the card payment gateway, plus an HTTP host.
//!
//! This crate provides:
//! - `ClientInitializer` - lazily builds and caches the provider client
//! - `PaymentProcessor` - tokenize card, create customer, confirm intent
//! - `PaymentHandler` - event in, `ResponseEnvelope` out
//! - Axum-based HTTP server hosting the handler
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/payment` | Process a payment |
//! | OPTIONS | `/payment` | CORS preflight |
//! | POST | `/invoke` | Event/envelope invocation |

pub mod config;
pub mod envelope;
pub mod gateway;
pub mod handlers;
pub mod initializer;
pub mod processor;
pub mod routes;
pub mod state;

pub use config::GatewayConfig;
pub use envelope::{ApiEvent, ResponseEnvelope};
pub use gateway::{HandlerOutcome, PaymentHandler};
pub use initializer::ClientInitializer;
pub use processor::{PaymentDefaults, PaymentProcessor};
pub use routes::create_router;
pub use state::AppState;
