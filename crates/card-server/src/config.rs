//! Server Configuration
//!
//! Read once at startup and shared read-only with every handler.

use std::fmt;
use std::path::PathBuf;

use card_payments::{DEFAULT_TOLERANCE_SECS, PaymentError, Result};

/// Immutable server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Publishable key, handed to the browser
    pub publishable_key: String,
    pub secret_key: String,
    pub webhook_secret: String,
    /// Webhook timestamp tolerance in seconds
    pub webhook_tolerance_secs: i64,
    pub static_dir: PathBuf,
    pub bind_addr: String,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("publishable_key", &self.publishable_key)
            .field("secret_key", &"[REDACTED]")
            .field("webhook_secret", &"[REDACTED]")
            .field("webhook_tolerance_secs", &self.webhook_tolerance_secs)
            .field("static_dir", &self.static_dir)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| PaymentError::Config(format!("{key} not set")))
        };

        let webhook_tolerance_secs = match lookup("STRIPE_WEBHOOK_TOLERANCE_SECS") {
            Some(v) => v.parse().map_err(|_| {
                PaymentError::Config(format!("STRIPE_WEBHOOK_TOLERANCE_SECS is not a number: {v}"))
            })?,
            None => DEFAULT_TOLERANCE_SECS,
        };

        Ok(Self {
            publishable_key: required("STRIPE_PUBLISHABLE_KEY")?,
            secret_key: required("STRIPE_SECRET_KEY")?,
            webhook_secret: required("STRIPE_WEBHOOK_SECRET")?,
            webhook_tolerance_secs,
            static_dir: lookup("STATIC_DIR").map_or_else(|| PathBuf::from("static"), PathBuf::from),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:4242".into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const KEYS: [(&str, &str); 3] = [
        ("STRIPE_PUBLISHABLE_KEY", "pk_test_123"),
        ("STRIPE_SECRET_KEY", "sk_test_123"),
        ("STRIPE_WEBHOOK_SECRET", "whsec_123"),
    ];

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&KEYS)).unwrap();
        assert_eq!(config.publishable_key, "pk_test_123");
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.bind_addr, "0.0.0.0:4242");
        assert_eq!(config.webhook_tolerance_secs, 300);
    }

    #[test]
    fn test_missing_secret_key() {
        let err = ServerConfig::from_lookup(lookup(&KEYS[..1])).unwrap_err();
        assert!(err.to_string().contains("STRIPE_SECRET_KEY"));
    }

    #[test]
    fn test_overrides() {
        let mut vars = KEYS.to_vec();
        vars.push(("STATIC_DIR", "../client"));
        vars.push(("STRIPE_WEBHOOK_TOLERANCE_SECS", "60"));
        let config = ServerConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.static_dir, PathBuf::from("../client"));
        assert_eq!(config.webhook_tolerance_secs, 60);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ServerConfig::from_lookup(lookup(&KEYS)).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk_test_123"));
        assert!(!debug.contains("whsec_123"));
    }
}
