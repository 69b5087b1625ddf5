//! Default values for every configuration section.

use crate::schema::*;
use scrobstats_common::current_year;
use std::path::PathBuf;

/// Default statistics backend location.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8888/.netlify/functions";
/// Default Last.fm API root.
pub const DEFAULT_LASTFM_URL: &str = "https://ws.audioscrobbler.com/2.0";
/// Default Discogs API root.
pub const DEFAULT_DISCOGS_URL: &str = "https://api.discogs.com";
/// Default chart palette.
pub const DEFAULT_PALETTE: &str = "palette10";
/// Default Discogs page size.
pub const DEFAULT_PER_PAGE: u32 = 50;

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            lastfm: LastFmConfig::default(),
            discogs: DiscogsConfig::default(),
            dashboard: DashboardConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BACKEND_URL.to_string(),
            timeout_seconds: None,
        }
    }
}

impl Default for LastFmConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_LASTFM_URL.to_string(),
            api_key: String::new(),
            api_secret: String::new(),
            user_agent: format!("scrobstats/{}", env!("CARGO_PKG_VERSION")),
            timeout_seconds: None,
        }
    }
}

impl Default for DiscogsConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DISCOGS_URL.to_string(),
            api_key: String::new(),
            api_secret: String::new(),
            per_page: DEFAULT_PER_PAGE,
            timeout_seconds: None,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_year: current_year(),
            initial_years: Vec::new(),
            palette: DEFAULT_PALETTE.to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            path: base.join("scrobstats").join("storage.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend.url, DEFAULT_BACKEND_URL);
        assert!(config.backend.timeout_seconds.is_none());
        assert_eq!(config.discogs.per_page, 50);
        assert_eq!(config.dashboard.palette, "palette10");
        assert_eq!(config.dashboard.starting_years(), vec![config.dashboard.default_year]);
        assert!(config.storage.path.ends_with("scrobstats/storage.json"));
        assert!(config.lastfm.user_agent.starts_with("scrobstats/"));
    }

    #[test]
    fn test_explicit_initial_years_win() {
        let dashboard = DashboardConfig {
            initial_years: vec![2020, 2021],
            ..DashboardConfig::default()
        };
        assert_eq!(dashboard.starting_years(), vec![2020, 2021]);
    }
}
