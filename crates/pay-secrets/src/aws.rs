//! # AWS Secrets Manager
//!
//! Single `GetSecretValue` lookup by ARN or name.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::Client;
use pay_core::{PaymentError, PaymentResult, SecretStore};
use tracing::{debug, instrument};

/// Secret store backed by AWS Secrets Manager
#[derive(Debug, Clone)]
pub struct AwsSecretStore {
    client: Client,
}

impl AwsSecretStore {
    /// Build a client from the default AWS credential/region chain
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self {
            client: Client::new(&config),
        }
    }

    /// Use an already configured SDK client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for AwsSecretStore {
    #[instrument(skip(self))]
    async fn get_secret_string(&self, secret_id: &str) -> PaymentResult<String> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| {
                PaymentError::SecretStore(format!(
                    "GetSecretValue failed for {}: {}",
                    secret_id,
                    DisplayErrorContext(&e)
                ))
            })?;

        debug!("Fetched secret: name={:?}", output.name());

        output.secret_string().map(str::to_owned).ok_or_else(|| {
            PaymentError::SecretStore(format!("secret {} has no string value", secret_id))
        })
    }

    fn backend_name(&self) -> &'static str {
        "aws-secrets-manager"
    }
}
