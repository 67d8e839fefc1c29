//! # Event Sinks
//!
//! Where verified payment outcomes go. The webhook receiver is a single
//! component; what it does with a `PaymentSucceeded` depends on the sink
//! chosen at startup.

use crate::error::{PaymentError, PaymentResult};
use crate::event::PaymentSucceeded;
use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// Outbound destination for payment outcomes.
///
/// Delivery is at-most-once: implementations hand the event off and
/// return without waiting for any consumer acknowledgment.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: &PaymentSucceeded) -> PaymentResult<()>;

    /// Sink name (for logging)
    fn name(&self) -> &'static str;
}

pub type BoxedEventSink = Arc<dyn EventSink>;

/// Sink that only writes events to the process log
pub struct LoggingEventSink;

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn publish(&self, event: &PaymentSucceeded) -> PaymentResult<()> {
        info!(
            stripe_payment_id = %event.stripe_payment_id,
            order_id = event.order_id.as_deref().unwrap_or("-"),
            receipt_url = event.receipt_url.as_deref().unwrap_or("-"),
            "Payment succeeded"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Which sink the process runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkKind {
    /// Publish on the message bus
    #[default]
    Nats,
    /// Log only
    Log,
}

impl FromStr for SinkKind {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nats" => Ok(SinkKind::Nats),
            "log" => Ok(SinkKind::Log),
            other => Err(PaymentError::Configuration(format!(
                "unknown event sink {:?} (expected \"nats\" or \"log\")",
                other
            ))),
        }
    }
}

impl std::fmt::Display for SinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkKind::Nats => write!(f, "nats"),
            SinkKind::Log => write!(f, "log"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_kind_parsing() {
        assert_eq!("nats".parse::<SinkKind>().unwrap(), SinkKind::Nats);
        assert_eq!(" LOG ".parse::<SinkKind>().unwrap(), SinkKind::Log);
        assert!("kafka".parse::<SinkKind>().is_err());
        assert_eq!(SinkKind::default(), SinkKind::Nats);
    }

    #[tokio::test]
    async fn test_logging_sink_accepts_events() {
        let event = PaymentSucceeded {
            stripe_payment_id: "ch_1".to_string(),
            order_id: Some("ord_1".to_string()),
            receipt_url: None,
        };

        assert!(LoggingEventSink.publish(&event).await.is_ok());
        assert_eq!(LoggingEventSink.name(), "log");
    }
}
