//! # Configuration Helpers
//!
//! Shared validation for environment-sourced settings. Every crate reads its
//! settings through a lookup function so tests never touch the process
//! environment.

use crate::error::{PaymentError, PaymentResult};
use url::Url;

/// Read a required, non-blank value
pub fn required<F>(lookup: &F, key: &str) -> PaymentResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or_else(|| PaymentError::Configuration(format!("{} not set", key)))
}

/// Read an optional value; blank counts as unset
pub fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Check that `value` is an absolute URI
pub fn uri(key: &str, value: String) -> PaymentResult<String> {
    match Url::parse(&value) {
        Ok(url) if url.has_host() => Ok(value),
        Ok(_) => Err(PaymentError::Configuration(format!(
            "{} must be an absolute URI with a host, got {:?}",
            key, value
        ))),
        Err(e) => Err(PaymentError::Configuration(format!(
            "{} must be a valid URI: {}",
            key, e
        ))),
    }
}

/// Split a comma-separated list, dropping blank entries
pub fn list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_required() {
        let lookup = vars(&[("A", "1"), ("BLANK", "  ")]);

        assert_eq!(required(&lookup, "A").unwrap(), "1");
        assert!(matches!(
            required(&lookup, "BLANK"),
            Err(PaymentError::Configuration(msg)) if msg == "BLANK not set"
        ));
        assert!(required(&lookup, "MISSING").is_err());
    }

    #[test]
    fn test_uri() {
        assert!(uri("U", "https://shop.test/payments/success".to_string()).is_ok());
        assert!(uri("U", "not a url".to_string()).is_err());
        assert!(uri("U", "/payments/success".to_string()).is_err());
        assert!(uri("U", "mailto:someone@shop.test".to_string()).is_err());
    }

    #[test]
    fn test_list() {
        assert_eq!(
            list("nats://a:4222, nats://b:4222,,"),
            vec!["nats://a:4222".to_string(), "nats://b:4222".to_string()]
        );
        assert!(list(" , ").is_empty());
    }
}
