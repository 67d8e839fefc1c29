//! # Message Envelopes
//!
//! Packet shapes used on the bus. They match the NestJS microservice
//! transport, which the other services in the system speak:
//!
//! ```text
//! event     {"pattern": "payment.succeeded", "data": {...}}
//! request   {"pattern": "create.payment.session", "data": {...}, "id": "..."}
//! response  {"id": "...", "response": {...}, "isDisposed": true}
//!           {"id": "...", "err": {"status": 400, "message": "..."}, "isDisposed": true}
//! ```

use pay_core::PaymentError;
use serde::{Deserialize, Serialize};

/// Fire-and-forget event
#[derive(Debug, Serialize)]
pub struct EventPacket<'a, T> {
    pub pattern: &'a str,
    pub data: &'a T,
}

/// Request expecting a reply
#[derive(Debug, Deserialize)]
pub struct RequestPacket<T> {
    #[serde(default)]
    pub pattern: Option<String>,
    pub data: T,
    pub id: String,
}

/// Error body of a failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub status: u16,
    pub message: String,
}

impl From<&PaymentError> for RpcError {
    fn from(err: &PaymentError) -> Self {
        Self {
            status: err.status_code(),
            message: err.to_string(),
        }
    }
}

/// Reply to a request
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePacket<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<RpcError>,
    pub is_disposed: bool,
}

impl<T> ResponsePacket<T> {
    pub fn ok(id: impl Into<String>, response: T) -> Self {
        Self {
            id: Some(id.into()),
            response: Some(response),
            err: None,
            is_disposed: true,
        }
    }

    pub fn err(id: Option<String>, err: RpcError) -> Self {
        Self {
            id,
            response: None,
            err: Some(err),
            is_disposed: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_packet_shape() {
        let data = json!({ "orderId": "ord_1" });
        let packet = EventPacket {
            pattern: "payment.succeeded",
            data: &data,
        };

        assert_eq!(
            serde_json::to_value(&packet).unwrap(),
            json!({ "pattern": "payment.succeeded", "data": { "orderId": "ord_1" } })
        );
    }

    #[test]
    fn test_response_packet_shapes() {
        let ok = ResponsePacket::ok("42", json!({ "url": "u" }));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({ "id": "42", "response": { "url": "u" }, "isDisposed": true })
        );

        let err: ResponsePacket<()> = ResponsePacket::err(
            Some("43".to_string()),
            RpcError::from(&PaymentError::InvalidRequest("Order has no items".into())),
        );
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "id": "43",
                "err": { "status": 400, "message": "Invalid request: Order has no items" },
                "isDisposed": true
            })
        );
    }
}
