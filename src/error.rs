//! Error handling module
//!
//! Provides unified error types for the whole pipeline.

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum ConductorError {
    #[error("invalid table name: {0}")]
    InvalidIdentifier(String),

    #[error("{0} connection string is empty. set the values in your .env file")]
    MissingConfiguration(&'static str),

    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("issue tracker error ({status}): {message}")]
    Tracker { status: u16, message: String },

    #[error("worksheet error: {0}")]
    Sheet(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for pipeline operations
pub type ConductorResult<T> = Result<T, ConductorError>;
