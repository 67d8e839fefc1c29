//! # Webhook Relay
//!
//! Dispatch of a verified processor event to the configured sink.

use crate::event::{PaymentSucceeded, ProcessorEvent};
use crate::sink::EventSink;
use tracing::{debug, error, info, warn};

/// What happened to a verified event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Handed to the sink
    Published(PaymentSucceeded),
    /// The sink refused it; the event is dropped
    PublishFailed(PaymentSucceeded),
    /// Event type this relay does not act on
    Unhandled(String),
}

/// Dispatch a verified event.
///
/// Never fails: the processor has already been told the notification was
/// received, so sink errors are logged and reported in the outcome only.
pub async fn relay_event(sink: &dyn EventSink, event: ProcessorEvent) -> RelayOutcome {
    match event {
        ProcessorEvent::ChargeSucceeded(charge) => {
            let payload = charge.to_payment_succeeded();
            if payload.order_id.is_none() {
                warn!(charge_id = %charge.id, "charge.succeeded without orderId metadata");
            }

            debug!(sink = sink.name(), order_id = ?payload.order_id, "Relaying payment");

            match sink.publish(&payload).await {
                Ok(()) => {
                    info!(
                        order_id = ?payload.order_id,
                        stripe_payment_id = %payload.stripe_payment_id,
                        sink = sink.name(),
                        "Relayed payment.succeeded"
                    );
                    RelayOutcome::Published(payload)
                }
                Err(e) => {
                    error!(order_id = ?payload.order_id, sink = sink.name(), "Publish failed: {}", e);
                    RelayOutcome::PublishFailed(payload)
                }
            }
        }
        ProcessorEvent::Other(event_type) => {
            info!(event_type = %event_type, "Unhandled event");
            RelayOutcome::Unhandled(event_type)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PaymentError, PaymentResult};
    use crate::event::ChargeSucceeded;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<PaymentSucceeded>>,
        fail: bool,
    }

    #[async_trait]
    impl EventSink for RecordingSink {
        async fn publish(&self, event: &PaymentSucceeded) -> PaymentResult<()> {
            if self.fail {
                return Err(PaymentError::Publish {
                    subject: "payment.succeeded".to_string(),
                    message: "connection closed".to_string(),
                });
            }
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn charge(order_id: Option<&str>) -> ProcessorEvent {
        let mut metadata = HashMap::new();
        if let Some(id) = order_id {
            metadata.insert("orderId".to_string(), id.to_string());
        }
        ProcessorEvent::ChargeSucceeded(ChargeSucceeded {
            id: "ch_1".to_string(),
            metadata: Some(metadata),
            receipt_url: Some("https://pay.stripe.com/receipts/ch_1".to_string()),
        })
    }

    #[tokio::test]
    async fn test_charge_succeeded_publishes_once() {
        let sink = RecordingSink::default();

        let outcome = relay_event(&sink, charge(Some("ord_7"))).await;

        assert!(matches!(outcome, RelayOutcome::Published(ref e) if e.order_id.as_deref() == Some("ord_7")));
        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].stripe_payment_id, "ch_1");
    }

    #[tokio::test]
    async fn test_other_events_are_ignored() {
        let sink = RecordingSink::default();

        let outcome = relay_event(&sink, ProcessorEvent::Other("payment_intent.created".into())).await;

        assert_eq!(outcome, RelayOutcome::Unhandled("payment_intent.created".into()));
        assert!(sink.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_order_id_is_still_published() {
        let sink = RecordingSink::default();

        let outcome = relay_event(&sink, charge(None)).await;

        assert!(matches!(outcome, RelayOutcome::Published(ref e) if e.order_id.is_none()));
        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].stripe_payment_id, "ch_1");
        assert_eq!(events[0].order_id, None);
    }

    #[tokio::test]
    async fn test_sink_failure_is_swallowed() {
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };

        let outcome = relay_event(&sink, charge(Some("ord_7"))).await;

        assert!(matches!(outcome, RelayOutcome::PublishFailed(_)));
    }
}
