//! Application-wide error types using thiserror.

use scrobstats_common::StatsError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Error raised by a library crate.
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// Output could not be rendered.
    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),

    /// A command needs credentials the configuration does not provide.
    #[error("Missing credentials: {0}")]
    MissingCredentials(&'static str),
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;
