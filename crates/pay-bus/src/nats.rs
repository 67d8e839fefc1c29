//! # NATS Event Sink
//!
//! Connection setup and the publish-to-bus sink.

use crate::config::NatsConfig;
use crate::envelope::EventPacket;
use async_nats::Client;
use async_trait::async_trait;
use bytes::Bytes;
use pay_core::{EventSink, PaymentError, PaymentResult, PaymentSucceeded, PAYMENT_SUCCEEDED};
use tracing::{debug, info, instrument};

/// Connect to the configured servers
#[instrument(skip(config), fields(servers = ?config.servers))]
pub async fn connect(config: &NatsConfig) -> PaymentResult<Client> {
    let addrs = config.server_addrs()?;

    let client = async_nats::ConnectOptions::new()
        .name(config.client_name.as_str())
        .connect(addrs.as_slice())
        .await
        .map_err(|e| PaymentError::NetworkError(format!("NATS connect failed: {}", e)))?;

    info!("Connected to NATS");
    Ok(client)
}

/// Publishes `payment.succeeded` events on the bus.
///
/// The publish only queues the message on the client; there is no
/// acknowledgment, outbox, or retry.
#[derive(Clone)]
pub struct NatsEventSink {
    client: Client,
    subject: String,
}

impl NatsEventSink {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            subject: PAYMENT_SUCCEEDED.to_string(),
        }
    }

    /// Serialize the event packet for `event`
    pub fn encode(event: &PaymentSucceeded) -> PaymentResult<Bytes> {
        let packet = EventPacket {
            pattern: PAYMENT_SUCCEEDED,
            data: event,
        };
        Ok(Bytes::from(serde_json::to_vec(&packet)?))
    }
}

#[async_trait]
impl EventSink for NatsEventSink {
    async fn publish(&self, event: &PaymentSucceeded) -> PaymentResult<()> {
        let payload = Self::encode(event)?;

        self.client
            .publish(self.subject.clone(), payload)
            .await
            .map_err(|e| PaymentError::Publish {
                subject: self.subject.clone(),
                message: e.to_string(),
            })?;

        debug!(subject = %self.subject, order_id = ?event.order_id, "Queued event");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "nats"
    }
}
