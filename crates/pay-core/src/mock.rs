//! # Mock Provider & In-Memory Secret Store
//!
//! Deterministic stand-ins for the external collaborators. Used by tests and
//! selectable at runtime with `PAYMENT_PROVIDER=mock` for local smoke runs.

use crate::error::{PaymentError, PaymentResult};
use crate::payment::CardDetails;
use crate::provider::{
    BoxedPaymentProvider, Customer, CustomerParams, PaymentIntent, PaymentIntentParams,
    PaymentMethod, PaymentProvider, ProviderConnector,
};
use crate::secret::SecretStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Provider call that a mock can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockStep {
    PaymentMethod,
    Customer,
    PaymentIntent,
}

/// How the mock provider responds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockBehavior {
    Succeed,
    FailAt {
        step: MockStep,
        message: String,
        code: Option<String>,
    },
}

impl MockBehavior {
    pub fn fail_at(step: MockStep, message: impl Into<String>, code: Option<&str>) -> Self {
        MockBehavior::FailAt {
            step,
            message: message.into(),
            code: code.map(String::from),
        }
    }
}

/// Mock payment provider counting calls per step
#[derive(Debug)]
pub struct MockProvider {
    behavior: MockBehavior,
    payment_method_calls: AtomicUsize,
    customer_calls: AtomicUsize,
    payment_intent_calls: AtomicUsize,
    last_intent: Mutex<Option<PaymentIntentParams>>,
}

impl MockProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            payment_method_calls: AtomicUsize::new(0),
            customer_calls: AtomicUsize::new(0),
            payment_intent_calls: AtomicUsize::new(0),
            last_intent: Mutex::new(None),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(MockBehavior::Succeed)
    }

    pub fn calls(&self, step: MockStep) -> usize {
        match step {
            MockStep::PaymentMethod => self.payment_method_calls.load(Ordering::SeqCst),
            MockStep::Customer => self.customer_calls.load(Ordering::SeqCst),
            MockStep::PaymentIntent => self.payment_intent_calls.load(Ordering::SeqCst),
        }
    }

    /// Parameters of the most recent payment intent request
    pub fn last_intent(&self) -> Option<PaymentIntentParams> {
        self.last_intent.lock().ok().and_then(|guard| guard.clone())
    }

    fn check(&self, step: MockStep) -> PaymentResult<()> {
        match &self.behavior {
            MockBehavior::FailAt {
                step: failing,
                message,
                code,
            } if *failing == step => Err(PaymentError::ProviderError {
                provider: "mock".to_string(),
                message: message.clone(),
                code: code.clone(),
            }),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockProvider {
    async fn create_payment_method(&self, _card: &CardDetails) -> PaymentResult<PaymentMethod> {
        self.payment_method_calls.fetch_add(1, Ordering::SeqCst);
        self.check(MockStep::PaymentMethod)?;
        Ok(PaymentMethod {
            id: "pm_mock123456789".to_string(),
        })
    }

    async fn create_customer(&self, _params: &CustomerParams) -> PaymentResult<Customer> {
        self.customer_calls.fetch_add(1, Ordering::SeqCst);
        self.check(MockStep::Customer)?;
        Ok(Customer {
            id: "cus_mock123456789".to_string(),
        })
    }

    async fn create_payment_intent(
        &self,
        params: &PaymentIntentParams,
    ) -> PaymentResult<PaymentIntent> {
        self.payment_intent_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_intent.lock() {
            *last = Some(params.clone());
        }
        self.check(MockStep::PaymentIntent)?;
        Ok(PaymentIntent {
            id: "pi_mock123456789".to_string(),
            status: "succeeded".to_string(),
            client_secret: "pi_mock123456789_secret_mock987654321".to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Connector handing out one shared mock provider
#[derive(Debug)]
pub struct MockConnector {
    provider: Arc<MockProvider>,
    connects: AtomicUsize,
}

impl MockConnector {
    pub fn new(provider: Arc<MockProvider>) -> Self {
        Self {
            provider,
            connects: AtomicUsize::new(0),
        }
    }

    pub fn provider(&self) -> Arc<MockProvider> {
        Arc::clone(&self.provider)
    }

    /// Number of clients built so far
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl ProviderConnector for MockConnector {
    fn connect(&self, _api_key: &str) -> PaymentResult<BoxedPaymentProvider> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(self.provider.clone() as BoxedPaymentProvider)
    }
}

/// Fixed secret map counting fetches
#[derive(Debug, Default)]
pub struct InMemorySecretStore {
    secrets: HashMap<String, String>,
    fetches: AtomicUsize,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, secret_id: impl Into<String>, payload: impl Into<String>) -> Self {
        self.secrets.insert(secret_id.into(), payload.into());
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn get_secret_string(&self, secret_id: &str) -> PaymentResult<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.secrets
            .get(secret_id)
            .cloned()
            .ok_or_else(|| PaymentError::SecretStore(format!("secret not found: {}", secret_id)))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
