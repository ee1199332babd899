//! # Payment Request Handler
//!
//! Entry point for one invocation. Every stage reports into a
//! [`HandlerOutcome`], which is turned into a status code only at the end:
//!
//! | Outcome | Status | Body |
//! |---------|--------|------|
//! | `Succeeded` | 200 | `{success: true, paymentIntentId, status, clientSecret}` |
//! | `Invalid` | 400 | `{error}` |
//! | `Declined` | 400 | `{success: false, error, code}` |
//! | `Internal` | 500 | `{error: "internal server error"}` |
//!
//! A body that is not valid JSON ends in `Internal`, like any other error
//! escaping the handler logic.

use crate::envelope::{ApiEvent, ErrorBody, ResponseEnvelope};
use crate::processor::PaymentProcessor;
use pay_core::{
    PaymentFailure, PaymentOutcome, PaymentRequestBody, PaymentResult, PaymentSuccess,
    ValidationError, INTERNAL_ERROR_MESSAGE,
};
use tracing::{error, info, instrument, warn};

/// Terminal state of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    Succeeded(PaymentSuccess),
    Invalid(ValidationError),
    Declined(PaymentFailure),
    Internal,
}

impl HandlerOutcome {
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerOutcome::Succeeded(_) => 200,
            HandlerOutcome::Invalid(_) | HandlerOutcome::Declined(_) => 400,
            HandlerOutcome::Internal => 500,
        }
    }

    pub fn into_envelope(self) -> ResponseEnvelope {
        let status = self.status_code();
        match self {
            HandlerOutcome::Succeeded(success) => ResponseEnvelope::json(status, &success),
            HandlerOutcome::Invalid(err) => {
                ResponseEnvelope::json(status, &ErrorBody::new(err.to_string()))
            }
            HandlerOutcome::Declined(failure) => ResponseEnvelope::json(status, &failure),
            HandlerOutcome::Internal => {
                ResponseEnvelope::json(status, &ErrorBody::new(INTERNAL_ERROR_MESSAGE))
            }
        }
    }
}

impl From<PaymentOutcome> for HandlerOutcome {
    fn from(outcome: PaymentOutcome) -> Self {
        match outcome {
            PaymentOutcome::Succeeded(success) => HandlerOutcome::Succeeded(success),
            PaymentOutcome::Failed(failure) => HandlerOutcome::Declined(failure),
        }
    }
}

pub struct PaymentHandler {
    processor: PaymentProcessor,
}

impl PaymentHandler {
    pub fn new(processor: PaymentProcessor) -> Self {
        Self { processor }
    }

    /// Handle one event. Never fails: every path yields an envelope.
    #[instrument(skip(self, event), fields(request_id = %uuid::Uuid::new_v4()))]
    pub async fn handle(&self, event: ApiEvent) -> ResponseEnvelope {
        info!(
            "Event received: body_bytes={}",
            event.body.as_ref().map_or(0, String::len)
        );

        let outcome = match self.dispatch(event).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to process request: {}", e);
                HandlerOutcome::Internal
            }
        };

        info!("Responding: status={}", outcome.status_code());
        outcome.into_envelope()
    }

    async fn dispatch(&self, event: ApiEvent) -> PaymentResult<HandlerOutcome> {
        let body = match event.body.filter(|b| !b.is_empty()) {
            Some(body) => body,
            None => {
                warn!("Rejected request: missing body");
                return Ok(HandlerOutcome::Invalid(ValidationError::MissingBody));
            }
        };

        let request = match PaymentRequestBody::from_json(&body)?.into_request() {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejected request: {}", e);
                return Ok(HandlerOutcome::Invalid(e));
            }
        };

        Ok(self.processor.process_payment(&request).await.into())
    }
}
