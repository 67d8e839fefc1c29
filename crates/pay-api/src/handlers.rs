//! # Request Handlers
//!
//! Axum request handlers for the payment API.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use pay_core::{relay_event, CheckoutSessionResult, PaymentError, PaymentSessionRequest};
use pay_stripe::SIGNATURE_HEADER;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

// =============================================================================
// Response Types
// =============================================================================

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn payment_error_to_response(err: PaymentError) -> ApiError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn webhook_error() -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("Webhook error", 400)),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "payments-relay",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a hosted checkout session for an order
#[instrument(skip(state, request), fields(order_id = %request.order_id, items = request.items.len()))]
pub async fn create_payment_session(
    State(state): State<AppState>,
    Json(request): Json<PaymentSessionRequest>,
) -> Result<Json<CheckoutSessionResult>, ApiError> {
    let session = state
        .strategy
        .create_checkout(&request)
        .await
        .map_err(|e| {
            error!("Failed to create checkout: {}", e);
            payment_error_to_response(e)
        })?;

    info!("Created checkout session for order {}", request.order_id);

    Ok(Json(session))
}

/// Handle processor webhook.
///
/// Once the signature checks out the answer is always 200, whatever the
/// event type and whatever the sink does with it.
#[instrument(skip(state, headers, body), fields(bytes = body.len()))]
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            warn!("Webhook without {} header", SIGNATURE_HEADER);
            webhook_error()
        })?;

    let event = state
        .strategy
        .verify_webhook(&body, signature)
        .await
        .map_err(|e| {
            error!("Webhook verification failed: {}", e);
            webhook_error()
        })?;

    info!(event_type = event.event_type(), "Received webhook");

    relay_event(state.sink.as_ref(), event).await;

    Ok(Json(serde_json::json!({ "sig": signature })))
}

/// Redirect target after a completed payment
pub async fn payment_success() -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": true,
        "message": "Payment successful"
    }))
}

/// Redirect target after a cancelled payment
pub async fn payment_cancel() -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": false,
        "message": "Payment cancelled"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
    }

    #[test]
    fn test_payment_error_conversion() {
        let (status, _json) = payment_error_to_response(PaymentError::InvalidRequest(
            "Bad data".to_string(),
        ));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = payment_error_to_response(PaymentError::ProviderError {
            provider: "stripe".to_string(),
            message: "Invalid currency".to_string(),
        });
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json.0.code, 502);
    }

    #[test]
    fn test_webhook_error_is_generic() {
        let (status, json) = webhook_error();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json.0.error, "Webhook error");
    }
}
