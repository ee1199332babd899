//! # pay-core
//!
//! Core types and traits for the card payment gateway.
//!
//! This crate provides:
//! - `PaymentRequestBody` / `PaymentRequest` for the inbound payment data
//! - `PaymentOutcome` for the normalized success/failure body
//! - `PaymentProvider` and `ProviderConnector` traits for payment providers
//! - `SecretStore` trait for API key lookup
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{PaymentRequestBody, PaymentProvider};
//!
//! let request = PaymentRequestBody::from_json(body)?.into_request()?;
//! let method = provider.create_payment_method(&request.card).await?;
//! ```

pub mod error;
pub mod mock;
pub mod payment;
pub mod provider;
pub mod secret;

// Re-exports for convenience
pub use error::{
    PaymentError, PaymentResult, ValidationError, GATEWAY_UNAVAILABLE_MESSAGE,
    INTERNAL_ERROR_MESSAGE, UNKNOWN_ERROR_CODE,
};
pub use payment::{
    CardDetails, PaymentFailure, PaymentOutcome, PaymentRequest, PaymentRequestBody,
    PaymentSuccess,
};
pub use provider::{
    BoxedPaymentProvider, BoxedProviderConnector, Customer, CustomerParams, PaymentIntent,
    PaymentIntentParams, PaymentMethod, PaymentProvider, ProviderConnector,
};
pub use secret::{ApiKeySecret, BoxedSecretStore, SecretStore};
