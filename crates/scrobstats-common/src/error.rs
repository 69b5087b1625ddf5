//! Error types and utilities for scrobstats

use thiserror::Error;

/// Result type alias for scrobstats operations
pub type Result<T> = std::result::Result<T, StatsError>;

/// Main error type for scrobstats operations
#[derive(Error, Debug)]
pub enum StatsError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport level failures (connect, timeout, body read)
    #[error("Network error: {message}")]
    Network {
        /// Human readable description
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Statistics backend errors
    #[error("Backend error: {message}")]
    Backend {
        /// Human readable description
        message: String,
        /// HTTP status, when the backend answered
        status_code: Option<u16>,
    },

    /// Last.fm API errors
    #[error("Last.fm API error: {message}")]
    LastFm {
        /// Human readable description
        message: String,
        /// Last.fm error code from the response envelope
        error_code: Option<u32>,
    },

    /// Discogs API errors
    #[error("Discogs API error: {message}")]
    Discogs {
        /// Human readable description
        message: String,
        /// HTTP status, when Discogs answered
        status_code: Option<u16>,
    },

    /// Client-local storage errors
    #[error("Storage error: {message}")]
    Storage {
        /// Human readable description
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors for user input or data
    #[error("Validation error: {message}")]
    Validation {
        /// Human readable description
        message: String,
        /// Offending field, if known
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        /// Human readable description
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StatsError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend {
            message: msg.into(),
            status_code: None,
        }
    }

    /// Create a new backend error with HTTP status
    pub fn backend_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Backend {
            message: msg.into(),
            status_code: Some(status),
        }
    }

    /// Create a new Last.fm error
    pub fn lastfm(msg: impl Into<String>) -> Self {
        Self::LastFm {
            message: msg.into(),
            error_code: None,
        }
    }

    /// Create a new Last.fm error carrying the API error code
    pub fn lastfm_with_code(msg: impl Into<String>, code: u32) -> Self {
        Self::LastFm {
            message: msg.into(),
            error_code: Some(code),
        }
    }

    /// Create a new Discogs error
    pub fn discogs(msg: impl Into<String>) -> Self {
        Self::Discogs {
            message: msg.into(),
            status_code: None,
        }
    }

    /// Create a new Discogs error with HTTP status
    pub fn discogs_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Discogs {
            message: msg.into(),
            status_code: Some(status),
        }
    }

    /// Create a new storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new storage error with source
    pub fn storage_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// HTTP status attached to the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Backend { status_code, .. } | Self::Discogs { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

// Error conversion implementations for external types

/// Convert from reqwest::Error to StatsError
impl From<reqwest::Error> for StatsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err)
        } else if err.is_decode() {
            Self::network_with_source("Malformed response body", err)
        } else if err.is_status() {
            let status_code = err.status().map_or(0, |s| s.as_u16());
            Self::network_with_source(format!("HTTP error: {status_code}"), err)
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}

/// Convert from serde_yaml::Error to StatsError
impl From<serde_yaml::Error> for StatsError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_with_source("YAML parsing error", err)
    }
}

/// Convert from toml::de::Error to StatsError
impl From<toml::de::Error> for StatsError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML parsing error", err)
    }
}
