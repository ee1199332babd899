//! # Application State
//!
//! Shared state for the Axum application. The payment handler owns the
//! cached provider client, so one state is built per process.

use crate::config::{GatewayConfig, ProviderKind, SecretBackend};
use crate::gateway::PaymentHandler;
use crate::initializer::ClientInitializer;
use crate::processor::{PaymentDefaults, PaymentProcessor};
use pay_core::mock::{MockConnector, MockProvider};
use pay_core::{BoxedProviderConnector, BoxedSecretStore};
use pay_secrets::{AwsSecretStore, EnvSecretStore};
use pay_stripe::StripeConnector;
use std::sync::Arc;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment request handler (owns the cached provider client)
    pub handler: Arc<PaymentHandler>,
}

impl AppState {
    pub fn new(handler: PaymentHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Wire the secret store and provider selected by `config`
    pub async fn from_config(config: GatewayConfig) -> anyhow::Result<Self> {
        let secrets: BoxedSecretStore = match config.secret_backend {
            SecretBackend::Aws => Arc::new(AwsSecretStore::from_env().await),
            SecretBackend::Env => Arc::new(EnvSecretStore::new()),
        };

        let connector: BoxedProviderConnector = match config.provider {
            ProviderKind::Stripe => {
                let mut connector = StripeConnector::new();
                if let Some(ref url) = config.stripe_api_base_url {
                    connector = connector.with_api_base_url(url.clone());
                }
                Arc::new(connector)
            }
            ProviderKind::Mock => Arc::new(MockConnector::new(Arc::new(MockProvider::succeeding()))),
        };

        info!(
            "Secret store: {}, provider: {:?}",
            secrets.backend_name(),
            config.provider
        );

        let initializer = ClientInitializer::new(secrets, connector, config.secret_id.clone());
        let processor = PaymentProcessor::new(initializer, payment_defaults(&config));

        Ok(Self::new(PaymentHandler::new(processor)))
    }
}

fn payment_defaults(config: &GatewayConfig) -> PaymentDefaults {
    PaymentDefaults {
        currency: config.default_currency.clone(),
        description: config.default_description.clone(),
        environment: config.environment.clone(),
    }
}
