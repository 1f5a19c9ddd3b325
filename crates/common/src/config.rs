use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::BridgeError;

/// Process-wide settings, read from the environment.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Fallback reference position, used until a GPS feed delivers a fix.
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub altitude: i32,
    #[serde(default)]
    pub geoid: f64,
    /// Fallback reference pressure in hPa.
    #[serde(default = "default_pressure")]
    pub pressure: f64,
    /// Latch the first good GPS fix and ignore the GPS feed afterwards.
    #[serde(default)]
    pub gnd_mode: bool,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// Aircraft above this altitude (m) are not fed into the store.
    #[serde(default = "default_filter")]
    pub max_height: i32,
    /// Aircraft farther than this (m) are kept but not reported.
    #[serde(default = "default_filter")]
    pub max_dist: i32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines instead of plain text.
    #[serde(default)]
    pub log_json: bool,
    /// Names of the feeds to run, each configured under `FEED_<NAME>_*`.
    #[serde(default)]
    pub feeds: Vec<String>,
}

/// Wire protocol spoken by an input feed.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Aprs,
    Sbs,
    Gps,
    Sensor,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    #[serde(skip)]
    pub name: String,
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub priority: u32,
    /// APRS login; anonymous read-only access when unset.
    #[serde(default)]
    pub login: Option<String>,
}

fn default_pressure() -> f64 {
    1013.25
}

fn default_server_port() -> u16 {
    4353
}

fn default_max_connections() -> usize {
    5
}

fn default_filter() -> i32 {
    i32::MAX
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();
        envy::from_env().context("Failed to load config from environment")
    }

    /// Loads the `FEED_<NAME>_*` section of every feed listed in `FEEDS`.
    pub fn feed_configs(&self) -> Result<Vec<FeedConfig>> {
        self.feeds
            .iter()
            .map(|name| {
                let prefix = feed_prefix(name);
                let mut feed: FeedConfig = envy::prefixed(prefix.as_str())
                    .from_env()
                    .map_err(|e| BridgeError::Config(format!("feed '{name}': {e}")))?;
                feed.name = name.clone();
                Ok(feed)
            })
            .collect()
    }
}

fn feed_prefix(name: &str) -> String {
    format!("FEED_{}_", name.trim().to_ascii_uppercase())
}
