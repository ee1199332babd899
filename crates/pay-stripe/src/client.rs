//! # Stripe REST Client
//!
//! Implementation of [`PaymentProvider`] over the Stripe REST API.
//! Every call is a form-encoded `POST` authenticated with the secret key.

use crate::config::{StripeConfig, DEFAULT_API_BASE_URL};
use async_trait::async_trait;
use pay_core::{
    BoxedPaymentProvider, CardDetails, Customer, CustomerParams, PaymentError, PaymentIntent,
    PaymentIntentParams, PaymentMethod, PaymentProvider, PaymentResult, ProviderConnector,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe client for card payments
pub struct StripeClient {
    config: StripeConfig,
    client: Client,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// POST form parameters to `path` and decode the JSON response
    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form_params: &[(String, String)],
    ) -> PaymentResult<T> {
        let url = format!("{}{}", self.config.api_base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(form_params)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: path={}, status={}", path, status);
            debug!("Stripe error body: {}", body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(PaymentError::ProviderError {
                    provider: PROVIDER.to_string(),
                    message: error_response.error.message,
                    code: error_response.error.code,
                });
            }

            return Err(PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}", status),
                code: None,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

fn card_params(card: &CardDetails) -> Vec<(String, String)> {
    vec![
        ("type".to_string(), "card".to_string()),
        ("card[number]".to_string(), card.number.clone()),
        ("card[exp_month]".to_string(), card.exp_month.to_string()),
        ("card[exp_year]".to_string(), card.exp_year.to_string()),
        ("card[cvc]".to_string(), card.cvc.clone()),
    ]
}

fn customer_params(params: &CustomerParams) -> Vec<(String, String)> {
    let mut form_params = vec![("payment_method".to_string(), params.payment_method.clone())];
    if let Some(ref email) = params.email {
        form_params.push(("email".to_string(), email.clone()));
    }
    if let Some(ref name) = params.name {
        form_params.push(("name".to_string(), name.clone()));
    }
    form_params
}

fn intent_params(params: &PaymentIntentParams) -> Vec<(String, String)> {
    let mut form_params = vec![
        ("amount".to_string(), params.amount.to_string()),
        ("currency".to_string(), params.currency.clone()),
        ("customer".to_string(), params.customer.clone()),
        ("payment_method".to_string(), params.payment_method.clone()),
        ("description".to_string(), params.description.clone()),
        ("confirm".to_string(), "true".to_string()),
    ];

    if let Some(ref return_url) = params.return_url {
        form_params.push(("return_url".to_string(), return_url.clone()));
    }

    for (key, value) in &params.metadata {
        form_params.push((format!("metadata[{}]", key), value.clone()));
    }

    form_params
}

#[async_trait]
impl PaymentProvider for StripeClient {
    #[instrument(skip(self, card), fields(last4 = %card.last4()))]
    async fn create_payment_method(&self, card: &CardDetails) -> PaymentResult<PaymentMethod> {
        let method: StripeObject = self
            .post_form("/v1/payment_methods", &card_params(card))
            .await?;

        debug!("Created Stripe payment method: id={}", method.id);
        Ok(PaymentMethod { id: method.id })
    }

    #[instrument(skip(self, params), fields(payment_method = %params.payment_method))]
    async fn create_customer(&self, params: &CustomerParams) -> PaymentResult<Customer> {
        let customer: StripeObject = self
            .post_form("/v1/customers", &customer_params(params))
            .await?;

        debug!("Created Stripe customer: id={}", customer.id);
        Ok(Customer { id: customer.id })
    }

    #[instrument(skip(self, params), fields(amount = params.amount, currency = %params.currency))]
    async fn create_payment_intent(
        &self,
        params: &PaymentIntentParams,
    ) -> PaymentResult<PaymentIntent> {
        let intent: StripePaymentIntentResponse = self
            .post_form("/v1/payment_intents", &intent_params(params))
            .await?;

        info!(
            "Created Stripe payment intent: id={}, status={}",
            intent.id, intent.status
        );

        Ok(PaymentIntent {
            id: intent.id,
            status: intent.status,
            client_secret: intent.client_secret.unwrap_or_default(),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Builds [`StripeClient`]s once the API key is known
#[derive(Debug, Clone)]
pub struct StripeConnector {
    api_base_url: String,
}

impl StripeConnector {
    pub fn new() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    fn config_for(&self, api_key: &str) -> StripeConfig {
        StripeConfig::new(api_key).with_api_base_url(self.api_base_url.clone())
    }
}

impl Default for StripeConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderConnector for StripeConnector {
    fn connect(&self, api_key: &str) -> PaymentResult<BoxedPaymentProvider> {
        let config = self.config_for(api_key);
        info!(
            "Stripe client configured: test_mode={}, base_url={}",
            config.is_test_mode(),
            config.api_base_url
        );
        Ok(Arc::new(StripeClient::new(config)?) as BoxedPaymentProvider)
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StripePaymentIntentResponse {
    id: String,
    status: String,
    #[serde(default)]
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn card() -> CardDetails {
        CardDetails {
            number: "4242424242424242".into(),
            exp_month: 12,
            exp_year: 2030,
            cvc: "123".into(),
        }
    }

    fn intent() -> PaymentIntentParams {
        let mut metadata = BTreeMap::new();
        metadata.insert("orderId".to_string(), "order_1".to_string());
        metadata.insert("environment".to_string(), "test".to_string());

        PaymentIntentParams {
            amount: 1000,
            currency: "brl".into(),
            customer: "cus_1".into(),
            payment_method: "pm_1".into(),
            description: "Online purchase".into(),
            return_url: Some("https://shop.example.com/return".into()),
            metadata,
        }
    }

    fn client_for(server: &MockServer) -> BoxedPaymentProvider {
        StripeConnector::new()
            .with_api_base_url(server.uri())
            .connect("sk_test_abc123")
            .unwrap()
    }

    #[test]
    fn test_intent_params_confirm_and_metadata() {
        let params = intent_params(&intent());
        assert!(params.contains(&("confirm".to_string(), "true".to_string())));
        assert!(params.contains(&("metadata[orderId]".to_string(), "order_1".to_string())));
        assert!(params.contains(&("metadata[environment]".to_string(), "test".to_string())));
    }

    #[test]
    fn test_customer_params_skip_absent_fields() {
        let params = customer_params(&CustomerParams {
            email: None,
            name: Some("Ana".into()),
            payment_method: "pm_1".into(),
        });
        assert_eq!(params.len(), 2);
        assert!(!params.iter().any(|(k, _)| k == "email"));
    }

    #[tokio::test]
    async fn test_create_payment_method_posts_card() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_methods"))
            .and(header("Authorization", "Bearer sk_test_abc123"))
            .and(body_string_contains("card%5Bnumber%5D=4242424242424242"))
            .and(body_string_contains("type=card"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "pm_123",
                "object": "payment_method"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let method = client_for(&server).create_payment_method(&card()).await.unwrap();
        assert_eq!(method.id, "pm_123");
    }

    #[tokio::test]
    async fn test_create_payment_intent_maps_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .and(body_string_contains("confirm=true"))
            .and(body_string_contains("amount=1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "pi_123",
                "status": "requires_action",
                "client_secret": "pi_123_secret_456"
            })))
            .mount(&server)
            .await;

        let intent = client_for(&server).create_payment_intent(&intent()).await.unwrap();
        assert_eq!(intent.id, "pi_123");
        assert_eq!(intent.status, "requires_action");
        assert_eq!(intent.client_secret, "pi_123_secret_456");
    }

    #[tokio::test]
    async fn test_card_error_carries_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_methods"))
            .respond_with(ResponseTemplate::new(402).set_body_json(serde_json::json!({
                "error": {
                    "type": "card_error",
                    "code": "incorrect_number",
                    "message": "Your card number is incorrect."
                }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).create_payment_method(&card()).await.unwrap_err();
        assert_eq!(err.error_code(), "incorrect_number");
        assert_eq!(err.public_message(), "Your card number is incorrect.");
    }

    #[tokio::test]
    async fn test_unparseable_error_has_no_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/customers"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_customer(&CustomerParams {
                email: Some("a@example.com".into()),
                name: None,
                payment_method: "pm_1".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::ProviderError { code: None, .. }));
        assert_eq!(err.error_code(), "unknown_error");
    }
}
