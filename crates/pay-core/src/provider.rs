//! # Payment Provider Trait
//!
//! Seam between the handler and the external payment provider.
//! Implementations: Stripe (`pay-stripe`), the mock in [`crate::mock`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  PaymentProvider (trait)                    │
//! │  ├── create_payment_method()   tokenize card                │
//! │  ├── create_customer()         attach payment method        │
//! │  └── create_payment_intent()   create + confirm             │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                  ┌─────────┴─────────┐
//!          ┌───────┴───────┐   ┌───────┴───────┐
//!          │ StripeClient  │   │ MockProvider  │
//!          └───────────────┘   └───────────────┘
//! ```
//!
//! Providers are built from an API key by a [`ProviderConnector`], because the
//! key is only known after the secret store has been read.

use crate::error::PaymentResult;
use crate::payment::CardDetails;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Tokenized payment method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
}

/// Provider-side customer record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
}

/// Provider-side payment intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub status: String,
    pub client_secret: String,
}

/// Parameters for creating a customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerParams {
    pub email: Option<String>,
    pub name: Option<String>,
    pub payment_method: String,
}

/// Parameters for creating and confirming a payment intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentParams {
    /// Amount in minor currency units
    pub amount: i64,
    pub currency: String,
    pub customer: String,
    pub payment_method: String,
    pub description: String,
    pub return_url: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

/// Core trait for payment provider clients.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Submit card details and return the tokenized payment method.
    async fn create_payment_method(&self, card: &CardDetails) -> PaymentResult<PaymentMethod>;

    /// Create a customer associated with a payment method.
    async fn create_customer(&self, params: &CustomerParams) -> PaymentResult<Customer>;

    /// Create a payment intent and confirm it in the same call.
    async fn create_payment_intent(
        &self,
        params: &PaymentIntentParams,
    ) -> PaymentResult<PaymentIntent>;

    /// Get the provider name (for logging and error tagging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment provider (dynamic dispatch)
pub type BoxedPaymentProvider = Arc<dyn PaymentProvider>;

/// Builds a provider client from an API key.
pub trait ProviderConnector: Send + Sync {
    fn connect(&self, api_key: &str) -> PaymentResult<BoxedPaymentProvider>;
}

/// Type alias for a shared connector
pub type BoxedProviderConnector = Arc<dyn ProviderConnector>;
