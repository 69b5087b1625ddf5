//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use scrobstats_common::LoggingConfig;

/// Main configuration structure for scrobstats.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Statistics backend configuration.
    pub backend: BackendConfig,
    /// Last.fm API configuration.
    pub lastfm: LastFmConfig,
    /// Discogs API configuration.
    pub discogs: DiscogsConfig,
    /// Dashboard defaults.
    pub dashboard: DashboardConfig,
    /// Client-local storage configuration.
    pub storage: StorageConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Statistics backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL the endpoint paths are appended to.
    pub url: String,
    /// Request timeout in seconds; the HTTP client default applies when unset.
    pub timeout_seconds: Option<u64>,
}

/// Last.fm API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LastFmConfig {
    /// API root.
    pub url: String,
    /// Application API key.
    pub api_key: String,
    /// Shared secret used to sign requests.
    pub api_secret: String,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

/// Discogs API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscogsConfig {
    /// API root.
    pub url: String,
    /// Consumer key.
    pub api_key: String,
    /// Consumer secret.
    pub api_secret: String,
    /// Page size used when walking a collection.
    pub per_page: u32,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

/// Dashboard defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Year shown when no year list has been persisted yet.
    pub default_year: i32,
    /// Years to start with; `[default_year]` when empty.
    pub initial_years: Vec<i32>,
    /// Chart palette name.
    pub palette: String,
}

impl DashboardConfig {
    /// The starting year list.
    pub fn starting_years(&self) -> Vec<i32> {
        if self.initial_years.is_empty() {
            vec![self.default_year]
        } else {
            self.initial_years.clone()
        }
    }
}

/// Client-local storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding the persisted key/value pairs.
    pub path: PathBuf,
}
