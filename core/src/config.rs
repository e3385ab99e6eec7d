//! Client configuration.
//!
//! `ClientConfig` deserializes with a default for every field, so an empty
//! document (or `ClientConfig::default()`) is a working configuration.
//! `from_env` overlays `SCRYFALL_*` environment variables on the defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::rate_limit::DEFAULT_CALLS_PER_SECOND;

pub const DEFAULT_BASE_URL: &str = "https://api.scryfall.com";

/// How a client gates its outbound calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitMode {
    /// The process-wide limiter.
    #[default]
    Shared,
    /// A limiter owned by this client, at `calls_per_second`.
    Private,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout (connect + read).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Only used when `rate_limit` is `private`.
    #[serde(default = "default_calls_per_second")]
    pub calls_per_second: f64,

    #[serde(default)]
    pub rate_limit: RateLimitMode,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Caching is opt-in per call unless this is set.
    #[serde(default)]
    pub cache_by_default: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_calls_per_second() -> f64 {
    DEFAULT_CALLS_PER_SECOND
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            calls_per_second: default_calls_per_second(),
            rate_limit: RateLimitMode::default(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_by_default: false,
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with `SCRYFALL_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(base_url) = lookup("SCRYFALL_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(user_agent) = lookup("SCRYFALL_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(timeout) = parse_var(&lookup, "SCRYFALL_TIMEOUT_SECS") {
            config.timeout_secs = timeout;
        }
        if let Some(rate) = parse_var(&lookup, "SCRYFALL_CALLS_PER_SECOND") {
            config.calls_per_second = rate;
            config.rate_limit = RateLimitMode::Private;
        }
        if let Some(ttl) = parse_var(&lookup, "SCRYFALL_CACHE_TTL_SECS") {
            config.cache_ttl_secs = ttl;
        }
        config
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "ignoring unparsable environment variable");
            None
        }
    }
}
