//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::services::distance::{
    ProximityConfig, DEFAULT_ATTRACTION_PROXIMITY_MILES, DEFAULT_REWARD_PROXIMITY_MILES,
};

/// Width of the bulk reward computation pool.
pub const DEFAULT_REWARDS_POOL_SIZE: usize = 50;
/// Width of the single-user asynchronous tracking pool.
pub const DEFAULT_TRACKING_POOL_SIZE: usize = 20;
/// Wait between two tracker passes.
pub const DEFAULT_TRACKING_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GeoJSON file holding the attraction catalog
    pub catalog_path: String,
    /// Wait between two full tracker passes
    pub tracking_poll_interval: Duration,
    /// Reward buffer in statute miles
    pub reward_proximity_miles: f64,
    /// Listing range in statute miles
    pub attraction_proximity_miles: f64,
    /// Concurrent tasks for bulk reward computation
    pub rewards_pool_size: usize,
    /// Concurrent tasks for asynchronous location tracking
    pub tracking_pool_size: usize,
    /// In-memory users registered at startup
    pub internal_user_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: "data/attractions.geojson".to_string(),
            tracking_poll_interval: DEFAULT_TRACKING_POLL_INTERVAL,
            reward_proximity_miles: DEFAULT_REWARD_PROXIMITY_MILES,
            attraction_proximity_miles: DEFAULT_ATTRACTION_PROXIMITY_MILES,
            rewards_pool_size: DEFAULT_REWARDS_POOL_SIZE,
            tracking_pool_size: DEFAULT_TRACKING_POOL_SIZE,
            internal_user_count: 0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        Ok(Self {
            catalog_path: env::var("CATALOG_PATH").unwrap_or(defaults.catalog_path),
            tracking_poll_interval: parse_var::<u64>("TRACKER_POLL_INTERVAL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.tracking_poll_interval),
            reward_proximity_miles: parse_var("REWARD_PROXIMITY_MILES")?
                .unwrap_or(defaults.reward_proximity_miles),
            attraction_proximity_miles: parse_var("ATTRACTION_PROXIMITY_MILES")?
                .unwrap_or(defaults.attraction_proximity_miles),
            rewards_pool_size: parse_var("REWARDS_POOL_SIZE")?
                .unwrap_or(defaults.rewards_pool_size),
            tracking_pool_size: parse_var("TRACKING_POOL_SIZE")?
                .unwrap_or(defaults.tracking_pool_size),
            internal_user_count: parse_var("INTERNAL_USER_COUNT")?
                .unwrap_or(defaults.internal_user_count),
        })
    }

    /// Proximity thresholds described by this configuration.
    pub fn proximity(&self) -> ProximityConfig {
        ProximityConfig {
            reward_buffer_miles: self.reward_proximity_miles,
            listing_range_miles: self.attraction_proximity_miles,
        }
    }
}

/// Read an optional variable and parse it, rejecting malformed values.
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
