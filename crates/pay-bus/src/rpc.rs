//! # Payment Session RPC
//!
//! Request/reply entry point for creating checkout sessions over the bus,
//! answering on `create.payment.session`.

use crate::config::NatsConfig;
use crate::envelope::{RequestPacket, ResponsePacket, RpcError};
use async_nats::{Client, Message};
use bytes::Bytes;
use futures::StreamExt;
use pay_core::{
    BoxedPaymentStrategy, CheckoutSessionResult, PaymentError, PaymentResult,
    PaymentSessionRequest, PaymentStrategy,
};
use tracing::{error, info, warn};

/// Subject the session builder answers on
pub const CREATE_PAYMENT_SESSION: &str = "create.payment.session";

/// Answer one raw request packet
pub async fn answer(
    strategy: &dyn PaymentStrategy,
    payload: &[u8],
) -> ResponsePacket<CheckoutSessionResult> {
    let packet: RequestPacket<serde_json::Value> = match serde_json::from_slice(payload) {
        Ok(packet) => packet,
        Err(e) => {
            warn!("Unreadable request packet: {}", e);
            return ResponsePacket::err(
                None,
                RpcError::from(&PaymentError::InvalidRequest(e.to_string())),
            );
        }
    };

    let request: PaymentSessionRequest = match serde_json::from_value(packet.data) {
        Ok(request) => request,
        Err(e) => {
            return ResponsePacket::err(
                Some(packet.id),
                RpcError::from(&PaymentError::InvalidRequest(e.to_string())),
            );
        }
    };

    match strategy.create_checkout(&request).await {
        Ok(result) => ResponsePacket::ok(packet.id, result),
        Err(e) => {
            error!(order_id = %request.order_id, "Failed to create checkout: {}", e);
            ResponsePacket::err(Some(packet.id), RpcError::from(&e))
        }
    }
}

async fn handle(client: Client, strategy: BoxedPaymentStrategy, message: Message) {
    let Some(reply) = message.reply.clone() else {
        warn!(subject = %message.subject, "Request without reply subject, dropping");
        return;
    };

    let response = answer(strategy.as_ref(), &message.payload).await;

    let bytes = match serde_json::to_vec(&response) {
        Ok(bytes) => Bytes::from(bytes),
        Err(e) => {
            error!("Failed to encode reply: {}", e);
            return;
        }
    };

    if let Err(e) = client.publish(reply, bytes).await {
        error!("Failed to send reply: {}", e);
    }
}

/// Serve `create.payment.session` until the subscription closes.
///
/// Each request runs on its own task.
pub async fn serve_payment_sessions(
    client: Client,
    config: &NatsConfig,
    strategy: BoxedPaymentStrategy,
) -> PaymentResult<()> {
    let subject = CREATE_PAYMENT_SESSION.to_string();
    let subscribed = match &config.queue_group {
        Some(group) => client.queue_subscribe(subject, group.clone()).await,
        None => client.subscribe(subject).await,
    };
    let mut subscriber = subscribed.map_err(|e| PaymentError::NetworkError(e.to_string()))?;

    info!(
        subject = CREATE_PAYMENT_SESSION,
        queue_group = config.queue_group.as_deref().unwrap_or("-"),
        "Listening for payment session requests"
    );

    while let Some(message) = subscriber.next().await {
        tokio::spawn(handle(client.clone(), strategy.clone(), message));
    }

    warn!("Payment session subscription closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pay_core::ProcessorEvent;
    use serde_json::{json, Value};

    struct FixedStrategy;

    #[async_trait]
    impl PaymentStrategy for FixedStrategy {
        async fn create_checkout(
            &self,
            request: &PaymentSessionRequest,
        ) -> PaymentResult<CheckoutSessionResult> {
            request.validate()?;
            Ok(CheckoutSessionResult {
                success_url: "https://shop.test/ok".to_string(),
                cancel_url: "https://shop.test/cancel".to_string(),
                url: format!("https://checkout.test/{}", request.order_id),
            })
        }

        async fn verify_webhook(&self, _: &[u8], _: &str) -> PaymentResult<ProcessorEvent> {
            unreachable!()
        }

        fn provider_name(&self) -> &'static str {
            "fixed"
        }
    }

    async fn reply_for(request: Value) -> Value {
        let bytes = serde_json::to_vec(&request).unwrap();
        serde_json::to_value(answer(&FixedStrategy, &bytes).await).unwrap()
    }

    #[tokio::test]
    async fn test_answer_success() {
        let reply = reply_for(json!({
            "pattern": "create.payment.session",
            "id": "req-1",
            "data": {
                "currency": "usd",
                "orderId": "ord_1",
                "items": [{ "name": "Shirt", "price": 20, "quantity": 2 }]
            }
        }))
        .await;

        assert_eq!(
            reply,
            json!({
                "id": "req-1",
                "response": {
                    "successUrl": "https://shop.test/ok",
                    "cancelUrl": "https://shop.test/cancel",
                    "url": "https://checkout.test/ord_1"
                },
                "isDisposed": true
            })
        );
    }

    #[tokio::test]
    async fn test_answer_validation_error() {
        let reply = reply_for(json!({
            "pattern": "create.payment.session",
            "id": "req-2",
            "data": { "currency": "usd", "orderId": "ord_2", "items": [] }
        }))
        .await;

        assert_eq!(reply["id"], "req-2");
        assert_eq!(reply["err"]["status"], 400);
        assert!(reply.get("response").is_none());
    }

    #[tokio::test]
    async fn test_answer_malformed_data() {
        let reply = reply_for(json!({ "id": "req-3", "data": { "currency": 5 } })).await;

        assert_eq!(reply["id"], "req-3");
        assert_eq!(reply["err"]["status"], 400);
    }

    #[tokio::test]
    async fn test_answer_unreadable_packet() {
        let response = answer(&FixedStrategy, b"garbage").await;

        assert!(response.id.is_none());
        assert_eq!(response.err.unwrap().status, 400);
    }
}
