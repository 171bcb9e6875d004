//! Error types for the aggregator

use thiserror::Error;

/// Aggregator-wide error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AkhbarError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid source ({source_name}): {message}")]
    InvalidSource {
        source_name: String,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AkhbarError {
    pub fn unknown_category(name: impl Into<String>) -> Self {
        AkhbarError::UnknownCategory(name.into())
    }

    pub fn invalid_source(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        AkhbarError::InvalidSource {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        AkhbarError::Config(msg.into())
    }
}

/// Result type alias for aggregator operations
pub type AkhbarResult<T> = Result<T, AkhbarError>;
