//! Structured logging infrastructure for scrobstats

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::error::{Result, StatsError};

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, colored output for interactive use
    #[default]
    Pretty,
    /// Single-line output
    Compact,
    /// Newline-delimited JSON records
    Json,
}

/// Configuration for the logging system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "scrobstats_api=trace")
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Optional file path for log output; stdout when absent
    pub file_path: Option<String>,
    /// Whether to emit span open/close events
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

impl LoggingConfig {
    /// Build the env filter, letting `RUST_LOG` take precedence over the configured level
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }

    fn span_events(&self) -> FmtSpan {
        if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Initialize the tracing subscriber with the given configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    let file = match &config.file_path {
        Some(path) => Some(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?,
        ),
        None => None,
    };

    let initialized = match (config.format, file) {
        (LogFormat::Json, Some(file)) => registry
            .with(
                fmt::layer()
                    .json()
                    .with_span_events(config.span_events())
                    .with_target(config.include_targets)
                    .with_writer(file),
            )
            .try_init(),
        (LogFormat::Json, None) => registry
            .with(
                fmt::layer()
                    .json()
                    .with_span_events(config.span_events())
                    .with_target(config.include_targets),
            )
            .try_init(),
        (LogFormat::Compact, Some(file)) => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_ansi(false)
                    .with_span_events(config.span_events())
                    .with_target(config.include_targets)
                    .with_writer(file),
            )
            .try_init(),
        (LogFormat::Compact, None) => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_span_events(config.span_events())
                    .with_target(config.include_targets),
            )
            .try_init(),
        (LogFormat::Pretty, Some(file)) => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_span_events(config.span_events())
                    .with_target(config.include_targets)
                    .with_writer(file),
            )
            .try_init(),
        (LogFormat::Pretty, None) => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_span_events(config.span_events())
                    .with_target(config.include_targets),
            )
            .try_init(),
    };

    initialized.map_err(|e| StatsError::config_with_source("Failed to install tracing subscriber", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.file_path.is_none());
        assert!(!config.include_spans);
        assert!(config.include_targets);
    }

    #[test]
    fn test_format_deserialization() {
        let config: LoggingConfig =
            serde_json::from_str(r#"{"level": "debug", "format": "json"}"#).unwrap();
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.include_targets);
    }

    #[test]
    fn test_span_events_follow_flag() {
        let mut config = LoggingConfig::default();
        assert_eq!(config.span_events(), FmtSpan::NONE);
        config.include_spans = true;
        assert_eq!(config.span_events(), FmtSpan::NEW | FmtSpan::CLOSE);
    }
}
