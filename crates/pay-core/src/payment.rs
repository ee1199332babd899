//! # Payment Request & Outcome
//!
//! Transient request/response shapes. Nothing here is persisted.
//!
//! The inbound body is deserialized into [`PaymentRequestBody`] with every
//! field optional, then checked for presence of the card and amount fields
//! to produce a [`PaymentRequest`]. Presence follows truthiness: an empty
//! string or a zero number counts as absent. No format, range or Luhn checks
//! are made; the provider rejects bad card data itself.
//!
//! Expiry and amount accept any JSON number with no fractional part, so
//! `12.0` reads as `12`. A fractional value such as `12.5` is malformed.

use crate::error::{PaymentError, ValidationError};
use crate::provider::PaymentIntent;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Raw payment body as sent by the caller
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequestBody {
    #[serde(default)]
    pub card_number: Option<String>,
    #[serde(default, deserialize_with = "integral")]
    pub exp_month: Option<u32>,
    #[serde(default, deserialize_with = "integral")]
    pub exp_year: Option<u32>,
    #[serde(default)]
    pub cvc: Option<String>,
    /// Amount in minor currency units
    #[serde(default, deserialize_with = "integral")]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub return_url: Option<String>,
}

impl PaymentRequestBody {
    /// Parse a JSON body. Wrong field types count as malformed, same as bad JSON.
    pub fn from_json(body: &str) -> Result<Self, PaymentError> {
        serde_json::from_str(body).map_err(|e| PaymentError::MalformedBody(e.to_string()))
    }

    /// Check that all required fields are present.
    pub fn into_request(self) -> Result<PaymentRequest, ValidationError> {
        let card_number = non_empty(self.card_number);
        let cvc = non_empty(self.cvc);
        let exp_month = self.exp_month.filter(|m| *m != 0);
        let exp_year = self.exp_year.filter(|y| *y != 0);
        let amount = self.amount.filter(|a| *a != 0);

        match (card_number, exp_month, exp_year, cvc, amount) {
            (Some(number), Some(exp_month), Some(exp_year), Some(cvc), Some(amount)) => {
                Ok(PaymentRequest {
                    card: CardDetails {
                        number,
                        exp_month,
                        exp_year,
                        cvc,
                    },
                    amount,
                    currency: non_empty(self.currency),
                    email: self.email,
                    name: self.name,
                    description: non_empty(self.description),
                    order_id: self.order_id,
                    return_url: self.return_url,
                })
            }
            _ => Err(ValidationError::IncompleteData),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Whole-number field that may arrive as `12` or `12.0`
fn integral<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let number = match Option::<serde_json::Number>::deserialize(deserializer)? {
        Some(number) => number,
        None => return Ok(None),
    };

    let whole = number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    });

    whole
        .and_then(|v| T::try_from(v).ok())
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("expected a whole number, got {}", number)))
}

/// Card data submitted for tokenization
#[derive(Clone, PartialEq, Eq)]
pub struct CardDetails {
    pub number: String,
    pub exp_month: u32,
    pub exp_year: u32,
    pub cvc: String,
}

impl CardDetails {
    /// Last four digits of the card number, for logs
    pub fn last4(&self) -> &str {
        let start = self.number.len().saturating_sub(4);
        self.number.get(start..).unwrap_or("")
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &format_args!("**** {}", self.last4()))
            .field("exp_month", &self.exp_month)
            .field("exp_year", &self.exp_year)
            .field("cvc", &"***")
            .finish()
    }
}

/// A payment request that passed presence validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub card: CardDetails,
    /// Amount in minor currency units
    pub amount: i64,
    pub currency: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub order_id: Option<String>,
    pub return_url: Option<String>,
}

/// Result of a payment attempt, serialized as the response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaymentOutcome {
    Succeeded(PaymentSuccess),
    Failed(PaymentFailure),
}

/// Confirmed (or pending confirmation) payment intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSuccess {
    pub success: bool,
    pub payment_intent_id: String,
    /// Status string as reported by the provider
    pub status: String,
    /// Token for any client-side confirmation step
    pub client_secret: String,
}

impl From<PaymentIntent> for PaymentSuccess {
    fn from(intent: PaymentIntent) -> Self {
        Self {
            success: true,
            payment_intent_id: intent.id,
            status: intent.status,
            client_secret: intent.client_secret,
        }
    }
}

/// Failure reported by the payment flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentFailure {
    pub success: bool,
    pub error: String,
    pub code: String,
}

impl PaymentFailure {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.into(),
        }
    }
}

impl From<&PaymentError> for PaymentFailure {
    fn from(err: &PaymentError) -> Self {
        Self::new(err.public_message(), err.error_code())
    }
}
