//! Relay configuration
//!
//! All settings come from the environment; anything unset falls back to the
//! defaults below.

use std::path::PathBuf;
use std::str::FromStr;

use crate::rate_limit::{DEFAULT_MAX_EVENTS, DEFAULT_WINDOW_MS};
use crate::registry::DEFAULT_SEND_QUEUE;
use crate::validation::DEFAULT_MAX_FIELD_BYTES;

/// Default cap for a single inbound frame (500 KiB)
pub const DEFAULT_MAX_EVENT_BYTES: usize = 500 * 1024;

pub const DEFAULT_LISTEN_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Runtime settings for the relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub rate_window_ms: u64,
    pub rate_max_events: usize,
    pub max_event_bytes: usize,
    pub max_field_bytes: usize,
    pub send_queue_capacity: usize,
    pub listen_port: u16,
    /// Directory served for non-API paths, if any
    pub static_dir: Option<PathBuf>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            rate_window_ms: DEFAULT_WINDOW_MS,
            rate_max_events: DEFAULT_MAX_EVENTS,
            max_event_bytes: DEFAULT_MAX_EVENT_BYTES,
            max_field_bytes: DEFAULT_MAX_FIELD_BYTES,
            send_queue_capacity: DEFAULT_SEND_QUEUE,
            listen_port: DEFAULT_LISTEN_PORT,
            static_dir: None,
        }
    }
}

impl RelayConfig {
    /// Create from environment variables
    ///
    /// Environment:
    /// - RATE_WINDOW_MS: Rate limit window in milliseconds (default 60000)
    /// - RATE_MAX_EVENTS: Events allowed per window (default 60)
    /// - MAX_EVENT_BYTES: Largest accepted inbound frame (default 512000)
    /// - MAX_FIELD_BYTES: Cap for nickname/color (default 128)
    /// - SEND_QUEUE_CAPACITY: Outbound frames buffered per connection (default 256)
    /// - LISTEN_PORT or PORT: TCP port (default 3000)
    /// - STATIC_DIR: Serve static files from this directory (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        parse_into(&lookup, "RATE_WINDOW_MS", &mut config.rate_window_ms);
        parse_into(&lookup, "RATE_MAX_EVENTS", &mut config.rate_max_events);
        parse_into(&lookup, "MAX_EVENT_BYTES", &mut config.max_event_bytes);
        parse_into(&lookup, "MAX_FIELD_BYTES", &mut config.max_field_bytes);
        parse_into(&lookup, "SEND_QUEUE_CAPACITY", &mut config.send_queue_capacity);

        // PORT is what most hosting platforms set
        if lookup("LISTEN_PORT").is_some() {
            parse_into(&lookup, "LISTEN_PORT", &mut config.listen_port);
        } else {
            parse_into(&lookup, "PORT", &mut config.listen_port);
        }

        config.static_dir = lookup("STATIC_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the relay unusable
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_nonzero("RATE_WINDOW_MS", self.rate_window_ms)?;
        require_nonzero("RATE_MAX_EVENTS", self.rate_max_events as u64)?;
        require_nonzero("MAX_EVENT_BYTES", self.max_event_bytes as u64)?;
        require_nonzero("SEND_QUEUE_CAPACITY", self.send_queue_capacity as u64)?;
        Ok(())
    }
}

fn parse_into<F, T>(lookup: &F, name: &'static str, slot: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    let Some(raw) = lookup(name) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *slot = value,
        Err(_) => tracing::warn!(name, value = %raw, default = %slot, "Ignoring unparseable setting"),
    }
}

fn require_nonzero(name: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            name,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(())
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
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RelayConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.rate_window_ms, 60_000);
        assert_eq!(config.rate_max_events, 60);
        assert_eq!(config.max_event_bytes, 512_000);
        assert_eq!(config.max_field_bytes, 128);
        assert_eq!(config.listen_port, 3000);
        assert_eq!(config.static_dir, None);
    }

    #[test]
    fn test_overrides() {
        let config = RelayConfig::from_lookup(lookup(&[
            ("RATE_WINDOW_MS", "1000"),
            ("RATE_MAX_EVENTS", "5"),
            ("MAX_EVENT_BYTES", "2048"),
            ("LISTEN_PORT", "8080"),
            ("STATIC_DIR", "public"),
        ]))
        .unwrap();
        assert_eq!(config.rate_window_ms, 1000);
        assert_eq!(config.rate_max_events, 5);
        assert_eq!(config.max_event_bytes, 2048);
        assert_eq!(config.listen_port, 8080);
        assert_eq!(config.static_dir, Some(PathBuf::from("public")));
    }

    #[test]
    fn test_port_fallback() {
        let config = RelayConfig::from_lookup(lookup(&[("PORT", "4000")])).unwrap();
        assert_eq!(config.listen_port, 4000);

        let config =
            RelayConfig::from_lookup(lookup(&[("PORT", "4000"), ("LISTEN_PORT", "5000")])).unwrap();
        assert_eq!(config.listen_port, 5000);
    }

    #[test]
    fn test_unparseable_keeps_default() {
        let config = RelayConfig::from_lookup(lookup(&[("RATE_MAX_EVENTS", "lots")])).unwrap();
        assert_eq!(config.rate_max_events, 60);
    }

    #[test]
    fn test_zero_is_rejected() {
        let err = RelayConfig::from_lookup(lookup(&[("RATE_MAX_EVENTS", "0")])).unwrap_err();
        assert!(err.to_string().contains("RATE_MAX_EVENTS"));
    }
}
