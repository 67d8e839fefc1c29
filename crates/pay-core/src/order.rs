//! # Order Types
//!
//! Payment session request and result types.
//! A request is transient: it is validated, priced and handed to the
//! processor, and nothing about it is kept afterwards.

use crate::error::{PaymentError, PaymentResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A line item in a payment session request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product name shown on the hosted checkout page
    pub name: String,

    /// Unit price in major currency units (e.g. dollars)
    pub price: Decimal,

    /// Quantity
    pub quantity: u32,
}

impl LineItem {
    pub fn new(name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Unit price in the processor's minor-unit integer representation
    pub fn unit_amount(&self) -> PaymentResult<i64> {
        to_minor_units(self.price)
    }
}

/// Convert a major-unit amount to minor units: `round(amount * 100)`.
///
/// Midpoints round away from zero, so `0.125` becomes `13`.
pub fn to_minor_units(amount: Decimal) -> PaymentResult<i64> {
    if amount.is_sign_negative() {
        return Err(PaymentError::InvalidPrice {
            message: format!("{} is negative", amount),
        });
    }

    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|cents| cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| PaymentError::InvalidPrice {
            message: format!("{} does not fit in minor units", amount),
        })
}

/// A line item priced for the processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLineItem {
    pub name: String,
    pub currency: String,
    pub unit_amount: i64,
    pub quantity: u32,
}

/// Request to open a hosted checkout session for one order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionRequest {
    /// ISO 4217 currency code, applied to every item
    pub currency: String,

    /// Caller's order identifier, attached to the payment as metadata
    pub order_id: String,

    /// Items to charge for, in display order
    pub items: Vec<LineItem>,
}

impl PaymentSessionRequest {
    pub fn new(
        currency: impl Into<String>,
        order_id: impl Into<String>,
        items: Vec<LineItem>,
    ) -> Self {
        Self {
            currency: currency.into(),
            order_id: order_id.into(),
            items,
        }
    }

    /// Lowercased, trimmed currency code as the processor expects it
    pub fn currency_code(&self) -> String {
        self.currency.trim().to_ascii_lowercase()
    }

    /// Reject requests the processor could never accept
    pub fn validate(&self) -> PaymentResult<()> {
        let currency = self.currency_code();
        if currency.is_empty() || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(PaymentError::InvalidRequest(format!(
                "currency must be an ISO code, got {:?}",
                self.currency
            )));
        }

        if self.order_id.trim().is_empty() {
            return Err(PaymentError::InvalidRequest(
                "orderId must not be empty".to_string(),
            ));
        }

        if self.items.is_empty() {
            return Err(PaymentError::InvalidRequest(
                "Order has no items".to_string(),
            ));
        }

        for (i, item) in self.items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(PaymentError::InvalidRequest(format!(
                    "items[{}].name must not be empty",
                    i
                )));
            }
            if item.price <= Decimal::ZERO {
                return Err(PaymentError::InvalidRequest(format!(
                    "items[{}].price must be positive",
                    i
                )));
            }
            if item.quantity == 0 {
                return Err(PaymentError::InvalidRequest(format!(
                    "items[{}].quantity must be at least 1",
                    i
                )));
            }
        }

        Ok(())
    }

    /// Validate and convert every item to the processor's representation
    pub fn priced_items(&self) -> PaymentResult<Vec<PricedLineItem>> {
        self.validate()?;
        let currency = self.currency_code();

        self.items
            .iter()
            .map(|item| {
                Ok(PricedLineItem {
                    name: item.name.clone(),
                    currency: currency.clone(),
                    unit_amount: item.unit_amount()?,
                    quantity: item.quantity,
                })
            })
            .collect()
    }
}

/// URLs returned to the caller once the processor has opened a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionResult {
    /// Where the processor sends the customer after paying
    pub success_url: String,

    /// Where the processor sends the customer after cancelling
    pub cancel_url: String,

    /// Hosted checkout page to redirect the customer to
    pub url: String,
}
