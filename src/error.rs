//! Domain-specific error types for taskwise

use thiserror::Error;

/// Main error type for the taskwise crate
#[derive(Error, Debug)]
pub enum TaskwiseError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unknown processor key: '{key}'. Known keys: {known}")]
    UnknownProcessorKey { key: String, known: String },

    #[error("I/O error reading {path}: {message}")]
    Io { path: String, message: String },
}

impl From<toml::de::Error> for TaskwiseError {
    fn from(err: toml::de::Error) -> Self {
        TaskwiseError::Config {
            message: format!("Invalid config file: {}", err),
        }
    }
}

/// Result type alias for taskwise operations
pub type Result<T> = std::result::Result<T, TaskwiseError>;
