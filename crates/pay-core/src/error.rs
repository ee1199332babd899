//! # Payment Error Types
//!
//! Typed error handling for the card payment gateway.
//! All payment operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Code reported to callers when the provider supplied none
pub const UNKNOWN_ERROR_CODE: &str = "unknown_error";

/// Message reported to callers when the provider client could not be built
pub const GATEWAY_UNAVAILABLE_MESSAGE: &str = "payment gateway unavailable";

/// Message reported to callers for any internal failure
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Request rejected before any provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The event carried no body, or an empty one
    #[error("missing request body")]
    MissingBody,

    /// One or more of card number, expiry month/year, CVC, amount is absent
    #[error("incomplete payment data")]
    IncompleteData,
}

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing env vars, unknown backends)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request failed presence validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Request body is not valid JSON for a payment request
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// Secret store lookup failed
    #[error("Secret store error: {0}")]
    SecretStore(String),

    /// Provider client could not be initialized
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError {
        provider: String,
        message: String,
        code: Option<String>,
    },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PaymentError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Validation(_) => 400,
            PaymentError::Initialization(_) => 400,
            PaymentError::SecretStore(_) => 400,
            PaymentError::ProviderError { .. } => 400,
            PaymentError::NetworkError(_) => 400,
            PaymentError::Configuration(_) => 500,
            PaymentError::MalformedBody(_) => 500,
            PaymentError::Serialization(_) => 500,
            PaymentError::Internal(_) => 500,
        }
    }

    /// Provider-supplied error code, or `unknown_error`
    pub fn error_code(&self) -> &str {
        match self {
            PaymentError::ProviderError {
                code: Some(code), ..
            } => code,
            _ => UNKNOWN_ERROR_CODE,
        }
    }

    /// Message that may be returned to the caller.
    ///
    /// Provider and network messages pass through unchanged. Secret-store and
    /// initialization details never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            PaymentError::Validation(v) => v.to_string(),
            PaymentError::ProviderError { message, .. } => message.clone(),
            PaymentError::NetworkError(message) => message.clone(),
            PaymentError::Initialization(_) | PaymentError::SecretStore(_) => {
                GATEWAY_UNAVAILABLE_MESSAGE.to_string()
            }
            PaymentError::Configuration(_)
            | PaymentError::MalformedBody(_)
            | PaymentError::Serialization(_)
            | PaymentError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
