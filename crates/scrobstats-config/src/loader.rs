//! Configuration loading utilities

use crate::Config;
use scrobstats_common::{Result as StatsResult, StatsError};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "SCROBSTATS_CONFIG";

/// File names tried in the working directory, in order.
pub const DEFAULT_CONFIG_FILES: [&str; 3] = ["scrobstats.yaml", "scrobstats.yml", "scrobstats.toml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Unknown file extension
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable name
        var: String,
        /// Parse failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for StatsError {
    fn from(err: ConfigError) -> Self {
        Self::config_with_source("Failed to load configuration", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the environment, the first config file found, or defaults.
    pub fn load() -> StatsResult<Config> {
        let mut config = match Self::locate() {
            Some(path) => {
                info!(path = %path.display(), "Loading configuration file");
                Self::read_file(&path)?
            }
            None => {
                debug!("No configuration file found, using defaults");
                Config::default()
            }
        };

        Self::apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file, with environment overrides applied.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> StatsResult<Config> {
        let mut config = Self::read_file(path.as_ref())?;
        Self::apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file, choosing the format by extension.
    pub fn read_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
            "toml" => Ok(toml::from_str(&content)?),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    fn locate() -> Option<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        DEFAULT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.exists())
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides_from(config, |name| env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SCROBSTATS_BACKEND_URL") {
            config.backend.url = url;
        }
        if let Some(timeout) = lookup("SCROBSTATS_BACKEND_TIMEOUT") {
            config.backend.timeout_seconds = Some(parse_var("SCROBSTATS_BACKEND_TIMEOUT", &timeout)?);
        }

        if let Some(key) = lookup("LASTFM_API_KEY") {
            config.lastfm.api_key = key;
        }
        if let Some(secret) = lookup("LASTFM_API_SECRET") {
            config.lastfm.api_secret = secret;
        }
        if let Some(agent) = lookup("LASTFM_USER_AGENT") {
            config.lastfm.user_agent = agent;
        }
        if let Some(timeout) = lookup("LASTFM_TIMEOUT") {
            config.lastfm.timeout_seconds = Some(parse_var("LASTFM_TIMEOUT", &timeout)?);
        }

        if let Some(key) = lookup("DISCOGS_API_KEY") {
            config.discogs.api_key = key;
        }
        if let Some(secret) = lookup("DISCOGS_API_SECRET") {
            config.discogs.api_secret = secret;
        }
        if let Some(timeout) = lookup("DISCOGS_TIMEOUT") {
            config.discogs.timeout_seconds = Some(parse_var("DISCOGS_TIMEOUT", &timeout)?);
        }

        if let Some(year) = lookup("SCROBSTATS_DEFAULT_YEAR") {
            config.dashboard.default_year = parse_var("SCROBSTATS_DEFAULT_YEAR", &year)?;
        }
        if let Some(palette) = lookup("SCROBSTATS_PALETTE") {
            config.dashboard.palette = palette;
        }

        if let Some(path) = lookup("SCROBSTATS_STORAGE_PATH") {
            config.storage.path = PathBuf::from(path);
        }

        if let Some(level) = lookup("SCROBSTATS_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim().parse().map_err(|e| ConfigError::EnvParseError {
        var: var.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = Config::default();
        ConfigLoader::apply_overrides_from(
            &mut config,
            lookup(&[
                ("SCROBSTATS_BACKEND_URL", "https://stats.example.com/api"),
                ("LASTFM_API_KEY", "key"),
                ("LASTFM_API_SECRET", "secret"),
                ("DISCOGS_TIMEOUT", "45"),
                ("SCROBSTATS_DEFAULT_YEAR", "2019"),
                ("SCROBSTATS_PALETTE", "palette3"),
                ("SCROBSTATS_STORAGE_PATH", "/tmp/scrobstats.json"),
                ("SCROBSTATS_LOG_LEVEL", "debug"),
            ]),
        )
        .unwrap();

        assert_eq!(config.backend.url, "https://stats.example.com/api");
        assert_eq!(config.lastfm.api_key, "key");
        assert_eq!(config.lastfm.api_secret, "secret");
        assert_eq!(config.discogs.timeout_seconds, Some(45));
        assert_eq!(config.dashboard.default_year, 2019);
        assert_eq!(config.dashboard.palette, "palette3");
        assert_eq!(config.storage.path, PathBuf::from("/tmp/scrobstats.json"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_unparseable_override_names_variable() {
        let mut config = Config::default();
        let err = ConfigLoader::apply_overrides_from(
            &mut config,
            lookup(&[("SCROBSTATS_DEFAULT_YEAR", "last year")]),
        )
        .unwrap_err();

        match err {
            ConfigError::EnvParseError { var, .. } => assert_eq!(var, "SCROBSTATS_DEFAULT_YEAR"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scrobstats.ini");
        std::fs::write(&path, "backend = nope").unwrap();

        assert!(matches!(
            ConfigLoader::read_file(&path),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "ini"
        ));
    }

    #[test]
    fn test_config_error_converts_to_config_variant() {
        let err: StatsError = ConfigError::UnsupportedFormat("ini".to_string()).into();
        assert!(matches!(err, StatsError::Config { .. }));
    }
}
