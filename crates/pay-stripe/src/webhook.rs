//! # Stripe Webhook Handling
//!
//! Signature verification and event decoding for Stripe webhooks.
//!
//! Stripe signs each delivery with a header of the form
//! `t=<unix seconds>,v1=<hex hmac>[,v1=...]`, where each `v1` is
//! `HMAC-SHA256(secret, "<t>.<raw body>")`.

use hmac::{Hmac, Mac};
use pay_core::{ChargeSucceeded, PaymentError, PaymentResult, ProcessorEvent};
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// Name of the HTTP header carrying the signature
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Parsed `Stripe-Signature` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub signatures: Vec<String>,
}

/// Parse a `Stripe-Signature` header. Unknown schemes (e.g. `v0`) are ignored.
pub fn parse_signature_header(header: &str) -> PaymentResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            "v1" => signatures.push(value.to_string()),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        PaymentError::WebhookVerificationFailed("Missing timestamp in signature".to_string())
    })?;

    if signatures.is_empty() {
        return Err(PaymentError::WebhookVerificationFailed(
            "No v1 signature found".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

fn signed_payload_mac(secret: &str, timestamp: i64, payload: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac
}

/// Hex signature Stripe would send for `payload` at `timestamp`
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    hex::encode(signed_payload_mac(secret, timestamp, payload).finalize().into_bytes())
}

/// Build a complete signature header, the way Stripe's test helpers do
pub fn signature_header(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    format!(
        "t={},v1={}",
        timestamp,
        compute_signature(secret, timestamp, payload)
    )
}

/// Verify `header` against `payload` at time `now` (unix seconds)
///
/// The tolerance is symmetric: timestamps more than `tolerance_secs` in the
/// past or in the future are both rejected.
pub fn verify_signature(
    secret: &str,
    payload: &[u8],
    header: &str,
    now: i64,
    tolerance_secs: i64,
) -> PaymentResult<()> {
    let parsed = parse_signature_header(header)?;

    if now.abs_diff(parsed.timestamp) > tolerance_secs.unsigned_abs() {
        return Err(PaymentError::WebhookVerificationFailed(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    let mac = signed_payload_mac(secret, parsed.timestamp, payload);
    let valid = parsed.signatures.iter().any(|sig| {
        hex::decode(sig)
            .map(|bytes| mac.clone().verify_slice(&bytes).is_ok())
            .unwrap_or(false)
    });

    if !valid {
        return Err(PaymentError::WebhookVerificationFailed(
            "Signature mismatch".to_string(),
        ));
    }

    Ok(())
}

#[derive(Debug, Deserialize)]
struct StripeWebhookEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: serde_json::Value,
}

/// Decode a verified payload into a typed event
pub fn decode_event(payload: &[u8]) -> PaymentResult<ProcessorEvent> {
    let event: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
        PaymentError::WebhookParseError(format!("Failed to parse webhook: {}", e))
    })?;

    debug!(event_id = %event.id, event_type = %event.event_type, "Decoded Stripe event");

    match event.event_type.as_str() {
        // Verified but unreadable charges are acknowledged and skipped.
        "charge.succeeded" => match serde_json::from_value::<ChargeSucceeded>(event.data.object) {
            Ok(charge) => Ok(ProcessorEvent::ChargeSucceeded(charge)),
            Err(e) => {
                warn!(event_id = %event.id, "Malformed charge object: {}", e);
                Ok(ProcessorEvent::Other(event.event_type))
            }
        },
        _ => Ok(ProcessorEvent::Other(event.event_type)),
    }
}
