//! # pay-core
//!
//! Core types and traits for the payments relay.
//!
//! This crate provides:
//! - `PaymentSessionRequest`, `LineItem` and `CheckoutSessionResult` for the checkout flow
//! - `PaymentStrategy` trait for implementing payment processors
//! - `ProcessorEvent` and `PaymentSucceeded` for webhook notifications
//! - `EventSink` and `relay_event` for forwarding payment outcomes
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{LineItem, PaymentSessionRequest, PaymentStrategy, relay_event};
//! use rust_decimal_macros::dec;
//!
//! let request = PaymentSessionRequest::new(
//!     "usd",
//!     "ord_123",
//!     vec![LineItem::new("Shirt", dec!(20.00), 2)],
//! );
//!
//! // Open a hosted checkout page and redirect the customer to `session.url`
//! let session = strategy.create_checkout(&request).await?;
//!
//! // Later, in the webhook endpoint
//! let event = strategy.verify_webhook(&body, signature).await?;
//! relay_event(sink.as_ref(), event).await;
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod order;
pub mod relay;
pub mod sink;
pub mod strategy;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use event::{
    ChargeSucceeded, PaymentSucceeded, ProcessorEvent, ORDER_ID_METADATA_KEY, PAYMENT_SUCCEEDED,
};
pub use order::{
    to_minor_units, CheckoutSessionResult, LineItem, PaymentSessionRequest, PricedLineItem,
};
pub use relay::{relay_event, RelayOutcome};
pub use sink::{BoxedEventSink, EventSink, LoggingEventSink, SinkKind};
pub use strategy::{BoxedPaymentStrategy, PaymentStrategy};
