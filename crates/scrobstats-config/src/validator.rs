//! Runtime validation of a loaded configuration.

use crate::schema::Config;
use scrobstats_common::{Result, StatsError};
use url::Url;

const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration.
    pub fn validate(config: &Config) -> Result<()> {
        validate_url(&config.backend.url, "backend.url")?;
        validate_url(&config.lastfm.url, "lastfm.url")?;
        validate_url(&config.discogs.url, "discogs.url")?;

        validate_timeout(config.backend.timeout_seconds, "backend.timeout_seconds")?;
        validate_timeout(config.lastfm.timeout_seconds, "lastfm.timeout_seconds")?;
        validate_timeout(config.discogs.timeout_seconds, "discogs.timeout_seconds")?;

        if !(1..=100).contains(&config.discogs.per_page) {
            return Err(StatsError::validation_field(
                "Page size must be between 1 and 100",
                "discogs.per_page",
            ));
        }

        if config.dashboard.default_year <= 0 {
            return Err(StatsError::validation_field(
                "Default year must be positive",
                "dashboard.default_year",
            ));
        }

        if let Some(year) = config.dashboard.initial_years.iter().find(|y| **y <= 0) {
            return Err(StatsError::validation_field(
                format!("Initial year {year} must be positive"),
                "dashboard.initial_years",
            ));
        }

        if config.dashboard.palette.trim().is_empty() {
            return Err(StatsError::validation_field(
                "Palette cannot be empty",
                "dashboard.palette",
            ));
        }

        Ok(())
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate(self)
    }
}

fn validate_url(value: &str, field: &str) -> Result<()> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| StatsError::validation_field(format!("'{value}' is not a valid URL: {e}"), field))
}

fn validate_timeout(value: Option<u64>, field: &str) -> Result<()> {
    match value {
        Some(secs) if secs == 0 || secs > MAX_TIMEOUT_SECONDS => Err(StatsError::validation_field(
            format!("Timeout must be between 1 and {MAX_TIMEOUT_SECONDS} seconds"),
            field,
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: StatsError) -> Option<String> {
        match err {
            StatsError::Validation { field, .. } => field,
            _ => None,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_backend_url() {
        let mut config = Config::default();
        config.backend.url = "not a url".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(field_of(err).as_deref(), Some("backend.url"));
    }

    #[test]
    fn test_rejects_out_of_range_timeout() {
        let mut config = Config::default();
        config.lastfm.timeout_seconds = Some(0);
        assert_eq!(
            field_of(config.validate().unwrap_err()).as_deref(),
            Some("lastfm.timeout_seconds")
        );

        config.lastfm.timeout_seconds = Some(301);
        assert!(config.validate().is_err());

        config.lastfm.timeout_seconds = Some(30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_page_size() {
        let mut config = Config::default();
        config.discogs.per_page = 0;
        assert_eq!(
            field_of(config.validate().unwrap_err()).as_deref(),
            Some("discogs.per_page")
        );
    }

    #[test]
    fn test_rejects_non_positive_years_and_empty_palette() {
        let mut config = Config::default();
        config.dashboard.initial_years = vec![2020, -1];
        assert_eq!(
            field_of(config.validate().unwrap_err()).as_deref(),
            Some("dashboard.initial_years")
        );

        let mut config = Config::default();
        config.dashboard.palette = "  ".to_string();
        assert_eq!(
            field_of(config.validate().unwrap_err()).as_deref(),
            Some("dashboard.palette")
        );
    }
}
