//! # Request Handlers
//!
//! Axum request handlers hosting the payment handler over HTTP.

use crate::envelope::{ApiEvent, ResponseEnvelope};
use crate::gateway::HandlerOutcome;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!("Dropping invalid response header: {}", name),
            }
        }

        response
    }
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "payment-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Raw HTTP payment: the request body becomes the event body
pub async fn create_payment(State(state): State<AppState>, body: Bytes) -> ResponseEnvelope {
    match ApiEvent::from_raw_body(&body) {
        Ok(event) => state.handler.handle(event).await,
        Err(e) => {
            error!("Rejected raw request: {}", e);
            HandlerOutcome::Internal.into_envelope()
        }
    }
}

/// Function-style invocation: event in, envelope out.
///
/// The event is decoded here rather than by the `Json` extractor so that a
/// malformed event still yields an envelope.
pub async fn invoke(State(state): State<AppState>, body: Bytes) -> Json<ResponseEnvelope> {
    let envelope = match ApiEvent::from_json_slice(&body) {
        Ok(event) => state.handler.handle(event).await,
        Err(e) => {
            error!("Rejected invocation event: {}", e);
            HandlerOutcome::Internal.into_envelope()
        }
    };
    Json(envelope)
}

/// CORS preflight
pub async fn preflight() -> ResponseEnvelope {
    ResponseEnvelope::preflight()
}
