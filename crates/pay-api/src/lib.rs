//! # pay-api
//!
//! HTTP API layer for payments-relay.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Checkout session creation
//! - The processor webhook receiver
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/payments/create-payment-session` | Create checkout session |
//! | POST | `/payments/webhook` | Stripe webhook |
//! | GET | `/payments/success` | Success redirect target |
//! | GET | `/payments/cancel` | Cancel redirect target |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
