//! # pay-stripe
//!
//! Stripe payment strategy for payments-relay.
//!
//! **StripeCheckoutStrategy** drives the Checkout Sessions API:
//! - Dynamic line items priced from the order
//! - One-time `payment` mode only
//! - The order id carried as payment intent metadata
//! - Fixed success/cancel redirect URLs from configuration
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_stripe::StripeCheckoutStrategy;
//! use pay_core::PaymentStrategy;
//!
//! // Create strategy from environment
//! let strategy = StripeCheckoutStrategy::from_env()?;
//!
//! // Create checkout session
//! let session = strategy.create_checkout(&request).await?;
//!
//! // Redirect user to session.url
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use pay_core::{relay_event, LoggingEventSink};
//!
//! // In your webhook endpoint:
//! let event = strategy.verify_webhook(payload, signature).await?;
//! relay_event(&LoggingEventSink, event).await;
//! ```

pub mod checkout;
pub mod config;
pub mod webhook;

// Re-exports
pub use checkout::StripeCheckoutStrategy;
pub use config::StripeConfig;
pub use webhook::{
    compute_signature, decode_event, parse_signature_header, signature_header, verify_signature,
    SIGNATURE_HEADER,
};
