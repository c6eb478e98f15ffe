//! Gateway configuration: defaults, `GATEWAY_*` environment overrides, validation.
//!
//! Environment variables (all optional):
//! `GATEWAY_MAX_ORDERS_PER_SEC`, `GATEWAY_SESSION_START`, `GATEWAY_SESSION_END`
//! (`HH:MM` or `HH:MM:SS`), `GATEWAY_SESSION_WRAP` (`true`/`false`),
//! `GATEWAY_DISPATCH_POLL_MS`, `GATEWAY_SESSION_POLL_MS`, `GATEWAY_SENT_TTL_SECS`
//! (`0` disables eviction), `GATEWAY_RESPONSE_LOG`.

use crate::error::{GatewayError, Result};
use crate::session::SessionWindow;
use chrono::NaiveTime;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Hard ceiling on sends per rolling one-second window. Must be > 0.
    pub max_orders_per_second: u32,
    pub session_start: NaiveTime,
    pub session_end: NaiveTime,
    /// Treat `session_start > session_end` as a window spanning midnight.
    pub wrap_midnight: bool,
    pub dispatch_poll_ms: u64,
    pub session_poll_ms: u64,
    /// Drop sent-order records with no response after this long. `None` keeps them forever.
    pub sent_order_ttl_secs: Option<u64>,
    pub response_log_path: PathBuf,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_orders_per_second: 100,
            session_start: NaiveTime::MIN,
            session_end: NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN),
            wrap_midnight: false,
            dispatch_poll_ms: 10,
            session_poll_ms: 1000,
            sent_order_ttl_secs: Some(300),
            response_log_path: PathBuf::from("order_responses.log"),
        }
    }
}

impl GatewayConfig {
    /// Defaults overlaid with any `GATEWAY_*` variables, then validated.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(v) = env_parse::<u32>("GATEWAY_MAX_ORDERS_PER_SEC")? {
            config.max_orders_per_second = v;
        }
        if let Some(v) = env_time("GATEWAY_SESSION_START")? {
            config.session_start = v;
        }
        if let Some(v) = env_time("GATEWAY_SESSION_END")? {
            config.session_end = v;
        }
        if let Some(v) = env_parse::<bool>("GATEWAY_SESSION_WRAP")? {
            config.wrap_midnight = v;
        }
        if let Some(v) = env_parse::<u64>("GATEWAY_DISPATCH_POLL_MS")? {
            config.dispatch_poll_ms = v;
        }
        if let Some(v) = env_parse::<u64>("GATEWAY_SESSION_POLL_MS")? {
            config.session_poll_ms = v;
        }
        if let Some(v) = env_parse::<u64>("GATEWAY_SENT_TTL_SECS")? {
            config.sent_order_ttl_secs = (v > 0).then_some(v);
        }
        if let Ok(v) = std::env::var("GATEWAY_RESPONSE_LOG") {
            config.response_log_path = PathBuf::from(v);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_orders_per_second == 0 {
            return Err(GatewayError::InvalidConfig(
                "max_orders_per_second must be greater than zero".into(),
            ));
        }
        if self.dispatch_poll_ms == 0 || self.session_poll_ms == 0 {
            return Err(GatewayError::InvalidConfig("poll intervals must be greater than zero".into()));
        }
        if self.sent_order_ttl_secs == Some(0) {
            return Err(GatewayError::InvalidConfig(
                "sent_order_ttl_secs must be greater than zero (use None to disable)".into(),
            ));
        }
        Ok(())
    }

    pub fn session_window(&self) -> SessionWindow {
        SessionWindow::new(self.session_start, self.session_end).with_wrap_midnight(self.wrap_midnight)
    }

    pub fn dispatch_poll_interval(&self) -> Duration {
        Duration::from_millis(self.dispatch_poll_ms)
    }

    pub fn session_poll_interval(&self) -> Duration {
        Duration::from_millis(self.session_poll_ms)
    }

    pub fn sent_order_ttl(&self) -> Option<Duration> {
        self.sent_order_ttl_secs.map(Duration::from_secs)
    }
}

/// Parses `HH:MM:SS` or `HH:MM`.
pub fn parse_time_of_day(key: &str, value: &str) -> Result<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| GatewayError::InvalidTime {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn env_time(key: &str) -> Result<Option<NaiveTime>> {
    match std::env::var(key) {
        Ok(v) => parse_time_of_day(key, &v).map(Some),
        Err(_) => Ok(None),
    }
}

fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| GatewayError::InvalidConfig(format!("{} has invalid value {:?}", key, v))),
        Err(_) => Ok(None),
    }
}
