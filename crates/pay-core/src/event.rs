//! # Event Types
//!
//! Verified processor notifications and the normalized facts derived from them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata key carrying the caller's order id through the processor
pub const ORDER_ID_METADATA_KEY: &str = "orderId";

/// Event name for a successful payment on the event channel
pub const PAYMENT_SUCCEEDED: &str = "payment.succeeded";

/// The charge object of a `charge.succeeded` notification
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChargeSucceeded {
    /// Processor charge id (`ch_...`)
    pub id: String,

    /// Absent or `null` metadata both decode as `None`
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,

    #[serde(default)]
    pub receipt_url: Option<String>,
}

impl ChargeSucceeded {
    /// Order id recovered from the payment's metadata
    pub fn order_id(&self) -> Option<&str> {
        self.metadata
            .as_ref()?
            .get(ORDER_ID_METADATA_KEY)
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Normalize into the event published on the channel
    pub fn to_payment_succeeded(&self) -> PaymentSucceeded {
        PaymentSucceeded {
            stripe_payment_id: self.id.clone(),
            order_id: self.order_id().map(str::to_string),
            receipt_url: self.receipt_url.clone(),
        }
    }
}

/// A verified notification from the payment processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessorEvent {
    /// `charge.succeeded`
    ChargeSucceeded(ChargeSucceeded),
    /// Any other event type, kept by name for logging
    Other(String),
}

impl ProcessorEvent {
    /// The processor's name for this event type
    pub fn event_type(&self) -> &str {
        match self {
            ProcessorEvent::ChargeSucceeded(_) => "charge.succeeded",
            ProcessorEvent::Other(name) => name,
        }
    }
}

/// Payment outcome published to the rest of the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSucceeded {
    pub stripe_payment_id: String,
    /// `null` when the charge carried no order id
    pub order_id: Option<String>,
    pub receipt_url: Option<String>,
}
