//! # Application State
//!
//! Configuration loaded once at startup, plus the shared state handed to
//! every request: the payment strategy and the event sink.

use pay_bus::NatsConfig;
use pay_core::config::optional;
use pay_core::{
    BoxedEventSink, BoxedPaymentStrategy, PaymentError, PaymentResult, SinkKind,
};
use pay_stripe::StripeConfig;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Where `payment.succeeded` events go
    pub event_sink: SinkKind,
    /// Stripe keys and redirect URLs
    pub stripe: StripeConfig,
    /// Message bus servers
    pub nats: NatsConfig,
}

impl AppConfig {
    /// Load from environment variables (and `.env`, if present)
    pub fn from_env() -> PaymentResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    /// Load and validate every setting; the first problem found is returned
    pub fn from_lookup<F>(lookup: &F) -> PaymentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = pay_core::config::required(lookup, "PORT")?
            .parse::<u16>()
            .map_err(|e| PaymentError::Configuration(format!("PORT must be a port number: {}", e)))?;

        let host = match optional(lookup, "HOST") {
            Some(host) => host.parse::<IpAddr>().map_err(|e| {
                PaymentError::Configuration(format!("HOST must be an IP address: {}", e))
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let event_sink = match optional(lookup, "PAYMENT_EVENT_SINK") {
            Some(kind) => kind.parse()?,
            None => SinkKind::default(),
        };

        Ok(Self {
            host,
            port,
            environment: optional(lookup, "ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            event_sink,
            stripe: StripeConfig::from_lookup(lookup)?,
            nats: NatsConfig::from_lookup(lookup)?,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment processor
    pub strategy: BoxedPaymentStrategy,
    /// Destination for verified payment outcomes
    pub sink: BoxedEventSink,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, strategy: BoxedPaymentStrategy, sink: BoxedEventSink) -> Self {
        Self {
            strategy,
            sink,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            ("PORT", "3003"),
            ("STRIPE_SECRET_KEY", "sk_test_abc"),
            ("STRIPE_SUCCESS_URL", "http://localhost:3003/payments/success"),
            ("STRIPE_CANCEL_URL", "http://localhost:3003/payments/cancel"),
            ("STRIPE_WEBHOOK_SECRET", "whsec_abc"),
            ("NATS_SERVERS", "nats://localhost:4222,nats://localhost:4223"),
        ]
    }

    fn without(key: &str) -> Vec<(&'static str, &'static str)> {
        complete().into_iter().filter(|(k, _)| *k != key).collect()
    }

    #[test]
    fn test_complete_config() {
        let config = AppConfig::from_lookup(&lookup(&complete())).unwrap();

        assert_eq!(config.port, 3003);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3003");
        assert_eq!(config.event_sink, SinkKind::Nats);
        assert_eq!(config.nats.servers.len(), 2);
        assert!(!config.is_production());
    }

    #[test]
    fn test_missing_nats_servers_is_fatal() {
        let err = AppConfig::from_lookup(&lookup(&without("NATS_SERVERS"))).unwrap_err();
        assert!(matches!(err, PaymentError::Configuration(ref m) if m.contains("NATS_SERVERS")));
    }

    #[test]
    fn test_every_required_variable() {
        for key in [
            "PORT",
            "STRIPE_SECRET_KEY",
            "STRIPE_SUCCESS_URL",
            "STRIPE_CANCEL_URL",
            "STRIPE_WEBHOOK_SECRET",
            "NATS_SERVERS",
        ] {
            let err = AppConfig::from_lookup(&lookup(&without(key))).unwrap_err();
            assert!(
                matches!(err, PaymentError::Configuration(ref m) if m.contains(key)),
                "{} should be required, got {}",
                key,
                err
            );
        }
    }

    #[test]
    fn test_malformed_values() {
        let mut vars = complete();
        vars[0] = ("PORT", "http");
        assert!(AppConfig::from_lookup(&lookup(&vars)).is_err());

        let mut vars = complete();
        vars.push(("PAYMENT_EVENT_SINK", "kafka"));
        assert!(AppConfig::from_lookup(&lookup(&vars)).is_err());

        let mut vars = complete();
        vars.push(("HOST", "not-an-ip"));
        assert!(AppConfig::from_lookup(&lookup(&vars)).is_err());
    }

    #[test]
    fn test_log_sink_and_host() {
        let mut vars = complete();
        vars.push(("PAYMENT_EVENT_SINK", "log"));
        vars.push(("HOST", "127.0.0.1"));
        vars.push(("ENVIRONMENT", "production"));

        let config = AppConfig::from_lookup(&lookup(&vars)).unwrap();
        assert_eq!(config.event_sink, SinkKind::Log);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3003");
        assert!(config.is_production());
    }
}
