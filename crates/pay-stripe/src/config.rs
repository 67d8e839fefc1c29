//! # Stripe Configuration
//!
//! Configuration management for the Stripe integration.
//! All secrets are loaded from environment variables.

use pay_core::config::{optional, required, uri};
use pay_core::PaymentResult;
use std::env;
use tracing::warn;

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";

/// Stripe's default tolerance for webhook timestamps
pub const DEFAULT_WEBHOOK_TOLERANCE_SECS: i64 = 300;

/// Stripe API configuration
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    /// Webhook signing secret (whsec_...)
    pub webhook_secret: String,

    /// Redirect after a completed payment
    pub success_url: String,

    /// Redirect after a cancelled payment
    pub cancel_url: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,

    /// Maximum age of a webhook signature timestamp
    pub webhook_tolerance_secs: i64,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STRIPE_SECRET_KEY`
    /// - `STRIPE_WEBHOOK_SECRET`
    /// - `STRIPE_SUCCESS_URL`
    /// - `STRIPE_CANCEL_URL`
    pub fn from_env() -> PaymentResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: &F) -> PaymentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = required(lookup, "STRIPE_SECRET_KEY")?;
        let webhook_secret = required(lookup, "STRIPE_WEBHOOK_SECRET")?;
        let success_url = uri("STRIPE_SUCCESS_URL", required(lookup, "STRIPE_SUCCESS_URL")?)?;
        let cancel_url = uri("STRIPE_CANCEL_URL", required(lookup, "STRIPE_CANCEL_URL")?)?;
        let api_base_url = match optional(lookup, "STRIPE_API_BASE_URL") {
            Some(url) => uri("STRIPE_API_BASE_URL", url)?,
            None => DEFAULT_API_BASE_URL.to_string(),
        };

        if !secret_key.starts_with("sk_") && !secret_key.starts_with("rk_") {
            warn!("STRIPE_SECRET_KEY does not look like a Stripe secret or restricted key");
        }

        if !webhook_secret.starts_with("whsec_") {
            warn!("STRIPE_WEBHOOK_SECRET does not start with whsec_");
        }

        Ok(Self {
            secret_key,
            webhook_secret,
            success_url,
            cancel_url,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            webhook_tolerance_secs: DEFAULT_WEBHOOK_TOLERANCE_SECS,
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        secret_key: impl Into<String>,
        webhook_secret: impl Into<String>,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            secret_key: secret_key.into(),
            webhook_secret: webhook_secret.into(),
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            webhook_tolerance_secs: DEFAULT_WEBHOOK_TOLERANCE_SECS,
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_") || self.secret_key.starts_with("rk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"<redacted>")
            .field("webhook_secret", &"<redacted>")
            .field("success_url", &self.success_url)
            .field("cancel_url", &self.cancel_url)
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .finish()
    }
}
