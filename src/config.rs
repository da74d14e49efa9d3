//! Environment-driven configuration.
//!
//! Read once at startup; the rest of the exporter only ever sees the
//! resulting [`Config`] value.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_NEARBY_DISTANCE_M, DEFAULT_UPDATE_PERIOD_SECS,
};

/// Runtime configuration for the exporter.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the upstream chain API.
    pub api_base_url: String,
    /// How long to sleep between poll cycles.
    pub update_period: Duration,
    /// Radius of the nearby-hotspot search, in meters.
    pub nearby_distance_m: u64,
    /// Hotspot names to track (resolved to addresses at startup).
    pub hotspot_names: Vec<String>,
    /// Hotspot addresses to track verbatim.
    pub hotspot_addresses: Vec<String>,
    /// Owner account addresses whose hotspots are all tracked.
    pub owner_addresses: Vec<String>,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// Unset variables fall back to their defaults; unparseable numeric
    /// values are logged and replaced by the default rather than aborting.
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            update_period: Duration::from_secs(env_u64(
                "UPDATE_PERIOD",
                DEFAULT_UPDATE_PERIOD_SECS,
            )),
            nearby_distance_m: env_u64("NEARBY_DISTANCE_M", DEFAULT_NEARBY_DISTANCE_M),
            hotspot_names: split_csv(&env::var("HOTSPOT_NAMES").unwrap_or_default()),
            hotspot_addresses: split_csv(&env::var("HOTSPOT_ADDRESSES").unwrap_or_default()),
            owner_addresses: split_csv(&env::var("OWNER_ADDRESSES").unwrap_or_default()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            update_period: Duration::from_secs(DEFAULT_UPDATE_PERIOD_SECS),
            nearby_distance_m: DEFAULT_NEARBY_DISTANCE_M,
            hotspot_names: Vec::new(),
            hotspot_addresses: Vec::new(),
            owner_addresses: Vec::new(),
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, default, "unparseable value, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_drops_empties() {
        assert_eq!(
            split_csv(" one ,two,, three ,"),
            vec!["one".to_string(), "two".to_string(), "three".to_string()]
        );
        assert!(split_csv("").is_empty());
        assert!(split_csv(" , ").is_empty());
    }
}
