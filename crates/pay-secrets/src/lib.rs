//! # pay-secrets
//!
//! [`SecretStore`](pay_core::SecretStore) backends:
//!
//! - [`AwsSecretStore`] - AWS Secrets Manager, used in deployment
//! - [`EnvSecretStore`] - environment variables, for local runs

pub mod aws;
pub mod env;

pub use aws::AwsSecretStore;
pub use env::EnvSecretStore;
