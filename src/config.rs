//! Service configuration, read from the environment.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::time::Duration;
use crate::{Result, StorefrontError};

pub const DEFAULT_ORDERS_API_URL: &str = "https://mirexa-store-backend.vercel.app/api/checkout";

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub orders_api_url: String,
    /// Offset the dashboard's calendar days are computed in.
    pub display_offset: FixedOffset,
    pub upstream_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8083,
            orders_api_url: DEFAULT_ORDERS_API_URL.to_string(),
            display_offset: Utc.fix(),
            upstream_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> { Self::from_lookup(|key| std::env::var(key).ok()) }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(port) = lookup("PORT") { config.port = parse("PORT", &port)?; }
        if let Some(url) = lookup("ORDERS_API_URL") { config.orders_api_url = url; }
        if let Some(raw) = lookup("DISPLAY_UTC_OFFSET_MINUTES") {
            let minutes: i32 = parse("DISPLAY_UTC_OFFSET_MINUTES", &raw)?;
            config.display_offset = minutes.checked_mul(60).and_then(FixedOffset::east_opt)
                .ok_or_else(|| StorefrontError::Config(format!("DISPLAY_UTC_OFFSET_MINUTES out of range: {}", minutes)))?;
        }
        if let Some(raw) = lookup("UPSTREAM_TIMEOUT_SECS") {
            config.upstream_timeout = Duration::from_secs(parse("UPSTREAM_TIMEOUT_SECS", &raw)?);
        }
        Ok(config)
    }

    /// Current time in the display offset.
    pub fn now(&self) -> DateTime<FixedOffset> { Utc::now().with_timezone(&self.display_offset) }
}

fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| StorefrontError::Config(format!("{} is not valid: {:?}", key, raw)))
}
