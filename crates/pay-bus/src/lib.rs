//! # pay-bus
//!
//! Message bus plumbing for payments-relay.
//!
//! - `NatsEventSink` publishes `payment.succeeded` events
//! - `serve_payment_sessions` answers `create.payment.session` requests
//! - `envelope` holds the packet shapes shared with the other services

pub mod config;
pub mod envelope;
pub mod nats;
pub mod rpc;

pub use config::NatsConfig;
pub use nats::{connect, NatsEventSink};
pub use rpc::{serve_payment_sessions, CREATE_PAYMENT_SESSION};
