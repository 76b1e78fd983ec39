//! Application-wide error types using thiserror.

use factory_common::DashError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Error raised by one of the library crates.
    #[error(transparent)]
    Dash(#[from] DashError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] factory_config::ConfigError),

    /// A blocking task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// JSON output error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;
