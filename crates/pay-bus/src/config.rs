//! # NATS Configuration

use async_nats::ServerAddr;
use pay_core::config::{list, optional, required};
use pay_core::{PaymentError, PaymentResult};

const DEFAULT_CLIENT_NAME: &str = "payments-relay";

/// Message bus connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NatsConfig {
    /// Server addresses from `NATS_SERVERS`, in the order given
    pub servers: Vec<String>,

    /// Connection name reported to the server
    pub client_name: String,

    /// Queue group for the request/reply subscription, so replicas share load
    pub queue_group: Option<String>,
}

impl NatsConfig {
    /// Required env vars:
    /// - `NATS_SERVERS` (comma-separated)
    ///
    /// Optional:
    /// - `NATS_QUEUE_GROUP`
    pub fn from_lookup<F>(lookup: &F) -> PaymentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = required(lookup, "NATS_SERVERS")?;
        let servers = list(&raw);

        if servers.is_empty() {
            return Err(PaymentError::Configuration(
                "NATS_SERVERS must list at least one server".to_string(),
            ));
        }

        for server in &servers {
            server.parse::<ServerAddr>().map_err(|e| {
                PaymentError::Configuration(format!(
                    "NATS_SERVERS entry {:?} is not a server address: {}",
                    server, e
                ))
            })?;
        }

        Ok(Self {
            servers,
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            queue_group: optional(lookup, "NATS_QUEUE_GROUP"),
        })
    }

    pub fn new(servers: Vec<String>) -> Self {
        Self {
            servers,
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            queue_group: None,
        }
    }

    /// Parsed server addresses
    pub fn server_addrs(&self) -> PaymentResult<Vec<ServerAddr>> {
        self.servers
            .iter()
            .map(|s| {
                s.parse::<ServerAddr>()
                    .map_err(|e| PaymentError::Configuration(format!("{}: {}", s, e)))
            })
            .collect()
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

    #[test]
    fn test_servers_split_on_commas() {
        let config = NatsConfig::from_lookup(&lookup(&[(
            "NATS_SERVERS",
            "nats://localhost:4222, nats://localhost:4223",
        )]))
        .unwrap();

        assert_eq!(
            config.servers,
            vec!["nats://localhost:4222", "nats://localhost:4223"]
        );
        assert_eq!(config.server_addrs().unwrap().len(), 2);
        assert_eq!(config.queue_group, None);
    }

    #[test]
    fn test_missing_servers_is_fatal() {
        let err = NatsConfig::from_lookup(&lookup(&[])).unwrap_err();
        assert!(matches!(err, PaymentError::Configuration(ref m) if m == "NATS_SERVERS not set"));
    }

    #[test]
    fn test_blank_server_list_is_fatal() {
        assert!(NatsConfig::from_lookup(&lookup(&[("NATS_SERVERS", " , ,")])).is_err());
    }

    #[test]
    fn test_queue_group() {
        let config = NatsConfig::from_lookup(&lookup(&[
            ("NATS_SERVERS", "nats://localhost:4222"),
            ("NATS_QUEUE_GROUP", "payments"),
        ]))
        .unwrap();

        assert_eq!(config.queue_group.as_deref(), Some("payments"));
    }
}
