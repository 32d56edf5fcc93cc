//! Process configuration read from the environment (and `.env`, if present).

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::domain::{ChatId, UserId};

const BOT_TOKEN: &str = "BOT_TOKEN";
const ADMIN_ID: &str = "ADMIN_ID";
const ORDERS_CHANNEL_ID: &str = "ORDERS_CHANNEL_ID";
const PRODUCTS_CHANNEL_ID: &str = "PRODUCTS_CHANNEL_ID";
const SESSION_IDLE_TIMEOUT_SECS: &str = "SESSION_IDLE_TIMEOUT_SECS";
const SESSION_SWEEP_INTERVAL_SECS: &str = "SESSION_SWEEP_INTERVAL_SECS";
const NOTIFICATION_QUEUE_CAPACITY: &str = "NOTIFICATION_QUEUE_CAPACITY";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, PartialEq)]
pub struct AppConfig {
    pub bot_token: String,
    pub admin_id: UserId,
    pub orders_channel: ChatId,
    pub products_channel: ChatId,
    pub session_idle_timeout: Duration,
    pub sweep_interval: Duration,
    pub notification_queue_capacity: usize,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("bot_token", &"<redacted>")
            .field("admin_id", &self.admin_id)
            .field("orders_channel", &self.orders_channel)
            .field("products_channel", &self.products_channel)
            .field("session_idle_timeout", &self.session_idle_timeout)
            .field("sweep_interval", &self.sweep_interval)
            .field("notification_queue_capacity", &self.notification_queue_capacity)
            .finish()
    }
}

impl AppConfig {
    /// Loads `.env` (missing file is fine) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = lookup(BOT_TOKEN)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::Missing(BOT_TOKEN))?;

        let config = Self {
            bot_token,
            admin_id: UserId(required(&lookup, ADMIN_ID)?),
            orders_channel: ChatId(required(&lookup, ORDERS_CHANNEL_ID)?),
            products_channel: ChatId(required(&lookup, PRODUCTS_CHANNEL_ID)?),
            session_idle_timeout: Duration::from_secs(optional(&lookup, SESSION_IDLE_TIMEOUT_SECS, 900)?),
            sweep_interval: Duration::from_secs(optional(&lookup, SESSION_SWEEP_INTERVAL_SECS, 60)?),
            notification_queue_capacity: optional(&lookup, NOTIFICATION_QUEUE_CAPACITY, 64)?,
        };

        if config.sweep_interval.is_zero() {
            return Err(invalid(SESSION_SWEEP_INTERVAL_SECS, "0"));
        }
        if config.notification_queue_capacity == 0 {
            return Err(invalid(NOTIFICATION_QUEUE_CAPACITY, "0"));
        }
        Ok(config)
    }
}

fn required<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<T, ConfigError> {
    let value = lookup(key).ok_or(ConfigError::Missing(key))?;
    value.trim().parse().map_err(|_| invalid(key, &value))
}

fn optional<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| invalid(key, &value)),
        None => Ok(default),
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("BOT_TOKEN", "123:abc"),
        ("ADMIN_ID", "42"),
        ("ORDERS_CHANNEL_ID", "-1001"),
        ("PRODUCTS_CHANNEL_ID", "-1002"),
    ];

    #[test]
    fn reads_required_values_and_defaults() {
        let config = AppConfig::from_lookup(lookup(BASE)).unwrap();
        assert_eq!(config.admin_id, UserId(42));
        assert_eq!(config.orders_channel, ChatId(-1001));
        assert_eq!(config.session_idle_timeout, Duration::from_secs(900));
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
        assert_eq!(config.notification_queue_capacity, 64);
    }

    #[test]
    fn blank_token_is_missing() {
        let mut vars = BASE.to_vec();
        vars[0] = ("BOT_TOKEN", "   ");
        assert_eq!(
            AppConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::Missing("BOT_TOKEN"))
        );
    }

    #[test]
    fn bad_numbers_are_invalid() {
        let mut vars = BASE.to_vec();
        vars.push(("SESSION_IDLE_TIMEOUT_SECS", "soon"));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::Invalid { key: "SESSION_IDLE_TIMEOUT_SECS", .. })
        ));

        let vars = [("BOT_TOKEN", "t"), ("ADMIN_ID", "admin")];
        assert!(matches!(
            AppConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::Invalid { key: "ADMIN_ID", .. })
        ));
    }

    #[test]
    fn zero_sweep_interval_is_rejected() {
        let mut vars = BASE.to_vec();
        vars.push(("SESSION_SWEEP_INTERVAL_SECS", "0"));
        assert!(AppConfig::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn debug_hides_token() {
        let config = AppConfig::from_lookup(lookup(BASE)).unwrap();
        assert!(!format!("{config:?}").contains("123:abc"));
    }
}
