//! # Client Initializer
//!
//! Holds the provider client for the life of the process. The first call to
//! [`ClientInitializer::ensure_client`] fetches the API key from the secret
//! store and builds the client; later calls return the cached handle without
//! touching the store. There is no refresh or invalidation: a rotated key is
//! only picked up by a new process.
//!
//! A failed initialization is not cached, so the next request tries again.

use pay_core::{
    ApiKeySecret, BoxedPaymentProvider, BoxedProviderConnector, BoxedSecretStore, PaymentError,
    PaymentResult,
};
use tokio::sync::OnceCell;
use tracing::{error, info, instrument};

pub struct ClientInitializer {
    secrets: BoxedSecretStore,
    connector: BoxedProviderConnector,
    secret_id: String,
    client: OnceCell<BoxedPaymentProvider>,
}

impl ClientInitializer {
    pub fn new(
        secrets: BoxedSecretStore,
        connector: BoxedProviderConnector,
        secret_id: impl Into<String>,
    ) -> Self {
        Self {
            secrets,
            connector,
            secret_id: secret_id.into(),
            client: OnceCell::new(),
        }
    }

    /// Return the cached client, building it on first use.
    ///
    /// Any failure is reported as [`PaymentError::Initialization`]; the
    /// underlying detail is logged here and not carried further.
    pub async fn ensure_client(&self) -> PaymentResult<BoxedPaymentProvider> {
        self.client
            .get_or_try_init(|| self.initialize())
            .await
            .cloned()
    }

    #[instrument(skip(self), fields(backend = self.secrets.backend_name()))]
    async fn initialize(&self) -> PaymentResult<BoxedPaymentProvider> {
        let client = self.build_client().await.map_err(|e| {
            error!("Failed to initialize payment client: {}", e);
            PaymentError::Initialization("failed to initialize payment gateway".to_string())
        })?;

        info!(
            "Payment client initialized: provider={}",
            client.provider_name()
        );
        Ok(client)
    }

    async fn build_client(&self) -> PaymentResult<BoxedPaymentProvider> {
        let payload = self.secrets.get_secret_string(&self.secret_id).await?;
        let secret = ApiKeySecret::parse(&payload)?;
        self.connector.connect(&secret.api_key)
    }
}
