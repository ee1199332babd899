//! # Payment Processor
//!
//! Runs the provider call sequence for one validated request:
//!
//! ```text
//! ensure_client ─▶ create_payment_method ─▶ create_customer ─▶ create_payment_intent
//! ```
//!
//! The first failing step ends the sequence. Objects created by earlier steps
//! are left in place on the provider side.

use crate::initializer::ClientInitializer;
use pay_core::{
    CustomerParams, PaymentFailure, PaymentIntent, PaymentIntentParams, PaymentOutcome,
    PaymentRequest, PaymentResult,
};
use std::collections::BTreeMap;
use tracing::{error, info, instrument};

/// Values applied when the request leaves them out
#[derive(Debug, Clone)]
pub struct PaymentDefaults {
    pub currency: String,
    pub description: String,
    /// Deployment tag written into intent metadata
    pub environment: String,
}

pub struct PaymentProcessor {
    initializer: ClientInitializer,
    defaults: PaymentDefaults,
}

impl PaymentProcessor {
    pub fn new(initializer: ClientInitializer, defaults: PaymentDefaults) -> Self {
        Self {
            initializer,
            defaults,
        }
    }

    /// Charge the card and normalize the result.
    #[instrument(skip(self, request), fields(amount = request.amount, last4 = %request.card.last4()))]
    pub async fn process_payment(&self, request: &PaymentRequest) -> PaymentOutcome {
        match self.charge(request).await {
            Ok(intent) => {
                info!(
                    "Payment processed: intent={}, status={}",
                    intent.id, intent.status
                );
                PaymentOutcome::Succeeded(intent.into())
            }
            Err(e) => {
                error!("Payment failed: {}", e);
                PaymentOutcome::Failed(PaymentFailure::from(&e))
            }
        }
    }

    async fn charge(&self, request: &PaymentRequest) -> PaymentResult<PaymentIntent> {
        let provider = self.initializer.ensure_client().await?;

        let method = provider.create_payment_method(&request.card).await?;

        let customer = provider
            .create_customer(&CustomerParams {
                email: request.email.clone(),
                name: request.name.clone(),
                payment_method: method.id.clone(),
            })
            .await?;

        provider
            .create_payment_intent(&self.intent_params(request, customer.id, method.id))
            .await
    }

    fn intent_params(
        &self,
        request: &PaymentRequest,
        customer: String,
        payment_method: String,
    ) -> PaymentIntentParams {
        let mut metadata = BTreeMap::new();
        if let Some(ref order_id) = request.order_id {
            metadata.insert("orderId".to_string(), order_id.clone());
        }
        metadata.insert("environment".to_string(), self.defaults.environment.clone());

        PaymentIntentParams {
            amount: request.amount,
            currency: request
                .currency
                .clone()
                .unwrap_or_else(|| self.defaults.currency.clone()),
            customer,
            payment_method,
            description: request
                .description
                .clone()
                .unwrap_or_else(|| self.defaults.description.clone()),
            return_url: request.return_url.clone(),
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pay_core::mock::{InMemorySecretStore, MockBehavior, MockConnector, MockProvider, MockStep};
    use pay_core::{CardDetails, UNKNOWN_ERROR_CODE};
    use std::sync::Arc;

    fn defaults() -> PaymentDefaults {
        PaymentDefaults {
            currency: "brl".into(),
            description: "Online purchase".into(),
            environment: "staging".into(),
        }
    }

    fn processor(behavior: MockBehavior) -> (PaymentProcessor, Arc<MockProvider>) {
        let provider = Arc::new(MockProvider::new(behavior));
        let connector = Arc::new(MockConnector::new(provider.clone()));
        let store = Arc::new(
            InMemorySecretStore::new().with_secret("stripe", r#"{"api_key":"sk_test_x"}"#),
        );
        let init = ClientInitializer::new(store, connector, "stripe");
        (PaymentProcessor::new(init, defaults()), provider)
    }

    fn request() -> PaymentRequest {
        PaymentRequest {
            card: CardDetails {
                number: "4242424242424242".into(),
                exp_month: 12,
                exp_year: 2030,
                cvc: "123".into(),
            },
            amount: 2500,
            currency: None,
            email: Some("customer@example.com".into()),
            name: None,
            description: None,
            order_id: Some("order_42".into()),
            return_url: Some("https://shop.example.com/done".into()),
        }
    }

    #[tokio::test]
    async fn test_success_applies_defaults_and_metadata() {
        let (processor, provider) = processor(MockBehavior::Succeed);

        let outcome = processor.process_payment(&request()).await;
        assert!(matches!(outcome, PaymentOutcome::Succeeded(_)));

        let intent = provider.last_intent().unwrap();
        assert_eq!(intent.amount, 2500);
        assert_eq!(intent.currency, "brl");
        assert_eq!(intent.description, "Online purchase");
        assert_eq!(intent.customer, "cus_mock123456789");
        assert_eq!(intent.payment_method, "pm_mock123456789");
        assert_eq!(intent.metadata.get("orderId").map(String::as_str), Some("order_42"));
        assert_eq!(intent.metadata.get("environment").map(String::as_str), Some("staging"));
    }

    #[tokio::test]
    async fn test_failure_short_circuits() {
        let (processor, provider) = processor(MockBehavior::fail_at(
            MockStep::PaymentMethod,
            "Invalid card",
            Some("card_error"),
        ));

        let outcome = processor.process_payment(&request()).await;
        assert_eq!(
            outcome,
            PaymentOutcome::Failed(PaymentFailure::new("Invalid card", "card_error"))
        );
        assert_eq!(provider.calls(MockStep::Customer), 0);
        assert_eq!(provider.calls(MockStep::PaymentIntent), 0);
    }

    #[tokio::test]
    async fn test_intent_failure_without_code() {
        let (processor, provider) = processor(MockBehavior::fail_at(
            MockStep::PaymentIntent,
            "Your card was declined.",
            None,
        ));

        match processor.process_payment(&request()).await {
            PaymentOutcome::Failed(failure) => {
                assert_eq!(failure.error, "Your card was declined.");
                assert_eq!(failure.code, UNKNOWN_ERROR_CODE);
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(provider.calls(MockStep::Customer), 1);
    }
}
