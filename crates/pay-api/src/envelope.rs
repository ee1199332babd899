//! # Event & Response Envelope
//!
//! HTTP-shaped invocation types. The handler consumes an [`ApiEvent`] and
//! always produces a [`ResponseEnvelope`] carrying a status code, the fixed
//! CORS headers and a JSON body string.

use pay_core::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::error;

/// Inbound HTTP-shaped event. Fields other than `body` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEvent {
    #[serde(default)]
    pub body: Option<String>,
}

impl ApiEvent {
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Event from a raw HTTP body. Empty bytes mean no body; non-UTF-8 is malformed.
    pub fn from_raw_body(bytes: &[u8]) -> PaymentResult<Self> {
        if bytes.is_empty() {
            return Ok(Self::empty());
        }
        let body = std::str::from_utf8(bytes)
            .map_err(|e| PaymentError::MalformedBody(format!("body is not UTF-8: {}", e)))?;
        Ok(Self::with_body(body))
    }

    /// Decode a full event document (`{"body": "..."}`)
    pub fn from_json_slice(bytes: &[u8]) -> PaymentResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| PaymentError::MalformedBody(e.to_string()))
    }
}

/// Body of validation and internal errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Outbound response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub fn cors_headers() -> BTreeMap<String, String> {
    [
        ("Content-Type", "application/json"),
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Headers", "Content-Type,Authorization"),
        ("Access-Control-Allow-Methods", "POST,OPTIONS"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl ResponseEnvelope {
    /// Serialize `body` as JSON under the fixed headers
    pub fn json<T: Serialize>(status_code: u16, body: &T) -> Self {
        match serde_json::to_string(body) {
            Ok(body) => Self {
                status_code,
                headers: cors_headers(),
                body,
            },
            Err(e) => {
                error!("Failed to serialize response body: {}", e);
                Self {
                    status_code: 500,
                    headers: cors_headers(),
                    body: r#"{"error":"internal server error"}"#.to_string(),
                }
            }
        }
    }

    /// CORS preflight answer
    pub fn preflight() -> Self {
        Self {
            status_code: 204,
            headers: cors_headers(),
            body: String::new(),
        }
    }
}
