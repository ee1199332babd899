//! # Gateway Configuration
//!
//! All settings come from environment variables (a `.env` file is loaded if
//! present). The provider API key is not configured here; it is fetched from
//! the secret store named by `STRIPE_SECRET_KEY_ARN` on first use.

use pay_core::{PaymentError, PaymentResult};
use std::net::SocketAddr;
use std::str::FromStr;

/// Where the provider API key is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretBackend {
    Aws,
    Env,
}

impl FromStr for SecretBackend {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aws" => Ok(SecretBackend::Aws),
            "env" => Ok(SecretBackend::Env),
            other => Err(PaymentError::Configuration(format!(
                "SECRET_STORE must be aws or env, got {}",
                other
            ))),
        }
    }
}

/// Which payment provider client to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Stripe,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stripe" => Ok(ProviderKind::Stripe),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(PaymentError::Configuration(format!(
                "PAYMENT_PROVIDER must be stripe or mock, got {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(PaymentError::Configuration(format!(
                "LOG_FORMAT must be pretty or json, got {}",
                other
            ))),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Deployment tag written into payment metadata
    pub environment: String,
    /// Secret identifier holding `{"api_key": ...}`
    pub secret_id: String,
    pub secret_backend: SecretBackend,
    pub provider: ProviderKind,
    /// Override for the Stripe API (testing)
    pub stripe_api_base_url: Option<String>,
    /// Currency used when the request omits one
    pub default_currency: String,
    /// Description used when the request omits one
    pub default_description: String,
    pub log_format: LogFormat,
}

impl GatewayConfig {
    /// Load from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> PaymentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_id = lookup("STRIPE_SECRET_KEY_ARN")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                PaymentError::Configuration("STRIPE_SECRET_KEY_ARN not set".to_string())
            })?;

        let port: u16 = match lookup("PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| PaymentError::Configuration(format!("invalid PORT: {}", p)))?,
            None => 8080,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            secret_id,
            secret_backend: lookup("SECRET_STORE")
                .map(|v| v.parse::<SecretBackend>())
                .transpose()?
                .unwrap_or(SecretBackend::Aws),
            provider: lookup("PAYMENT_PROVIDER")
                .map(|v| v.parse::<ProviderKind>())
                .transpose()?
                .unwrap_or(ProviderKind::Stripe),
            stripe_api_base_url: lookup("STRIPE_API_BASE_URL"),
            default_currency: lookup("DEFAULT_CURRENCY").unwrap_or_else(|| "brl".to_string()),
            default_description: lookup("DEFAULT_DESCRIPTION")
                .unwrap_or_else(|| "Online purchase".to_string()),
            log_format: lookup("LOG_FORMAT")
                .map(|v| v.parse::<LogFormat>())
                .transpose()?
                .unwrap_or(LogFormat::Pretty),
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> PaymentResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| PaymentError::Configuration(format!("invalid bind address: {}", e)))
    }
}
