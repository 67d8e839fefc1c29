//! # Payment Strategy Trait
//!
//! The seam between the relay and a concrete payment processor.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PaymentStrategy (trait)                  │
//! │  ├── create_checkout()   order → hosted checkout URLs       │
//! │  ├── verify_webhook()    raw body + signature → event       │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                    ┌───────┴───────┐
//!                    │StripeCheckout │
//!                    │   Strategy    │
//!                    └───────────────┘
//! ```

use crate::error::PaymentResult;
use crate::event::ProcessorEvent;
use crate::order::{CheckoutSessionResult, PaymentSessionRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for payment processor implementations.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Create a one-time payment checkout session.
    ///
    /// Redirect URLs are fixed by the implementation's configuration, not by
    /// the caller. Processor rejections are returned unmodified and are
    /// never retried.
    async fn create_checkout(
        &self,
        request: &PaymentSessionRequest,
    ) -> PaymentResult<CheckoutSessionResult>;

    /// Verify a webhook signature and decode the event.
    ///
    /// # Arguments
    /// * `payload` - Raw webhook body bytes, exactly as received
    /// * `signature` - Signature header from the request
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> PaymentResult<ProcessorEvent>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment strategy (dynamic dispatch)
pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;
