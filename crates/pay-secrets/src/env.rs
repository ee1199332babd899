//! # Environment Secret Store
//!
//! Local-development backend: the secret payload is read from an
//! environment variable derived from the secret id. `stripe/api-key`
//! becomes `STRIPE_API_KEY`.

use async_trait::async_trait;
use pay_core::{PaymentError, PaymentResult, SecretStore};

#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    pub fn new() -> Self {
        Self
    }

    /// Environment variable name for a secret id
    pub fn var_name(secret_id: &str) -> String {
        secret_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get_secret_string(&self, secret_id: &str) -> PaymentResult<String> {
        let var = Self::var_name(secret_id);
        std::env::var(&var)
            .map_err(|_| PaymentError::SecretStore(format!("environment variable {} not set", var)))
    }

    fn backend_name(&self) -> &'static str {
        "env"
    }
}
