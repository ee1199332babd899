//! # pay-stripe
//!
//! Stripe payment provider for the card payment gateway.
//!
//! A payment runs as three sequential Stripe calls:
//!
//! 1. `POST /v1/payment_methods` - tokenize the card
//! 2. `POST /v1/customers` - create a customer holding that payment method
//! 3. `POST /v1/payment_intents` - create and confirm the charge
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_stripe::StripeConnector;
//! use pay_core::ProviderConnector;
//!
//! // The API key comes from the secret store
//! let provider = StripeConnector::new().connect(&api_key)?;
//! let method = provider.create_payment_method(&request.card).await?;
//! ```

pub mod client;
pub mod config;

// Re-exports
pub use client::{StripeClient, StripeConnector};
pub use config::StripeConfig;
