//! # Secret Store
//!
//! Key-value secret lookup by identifier. The provider API key lives in a
//! JSON payload of the form `{"api_key": "..."}`.

use crate::error::{PaymentError, PaymentResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the raw string payload stored under `secret_id`.
    async fn get_secret_string(&self, secret_id: &str) -> PaymentResult<String>;

    /// Backend name, for logs.
    fn backend_name(&self) -> &'static str;
}

pub type BoxedSecretStore = Arc<dyn SecretStore>;

/// Provider API key parsed from a secret payload
#[derive(Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

impl ApiKeySecret {
    pub fn parse(payload: &str) -> PaymentResult<Self> {
        let secret: ApiKeySecret = serde_json::from_str(payload).map_err(|e| {
            PaymentError::Initialization(format!("secret payload is not valid: {}", e))
        })?;

        if secret.api_key.trim().is_empty() {
            return Err(PaymentError::Initialization(
                "secret payload has an empty api_key".to_string(),
            ));
        }

        Ok(secret)
    }
}

impl fmt::Debug for ApiKeySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeySecret")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
