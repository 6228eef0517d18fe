use thiserror::Error;

use crate::record::ScalarKind;

#[derive(Debug, Error)]
pub enum RowMapError {
    #[error("Cannot open database {path}: {message}")]
    ConnectionError { path: String, message: String },

    #[error("Database handle is not connected")]
    NotConnected,

    #[error("Sqlite error during prepare: {0}")]
    PrepareError(String),

    #[error("Sqlite error during binding of parameter {position}: {message}")]
    BindError { position: usize, message: String },

    #[error("Sqlite error during step: {0}")]
    StepError(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),

    #[error("Column `{column}` is NULL but the {kind} field is not optional")]
    UnexpectedNull { column: String, kind: ScalarKind },

    #[error("Failed to read column `{column}`: {message}")]
    DecodeError { column: String, message: String },

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl RowMapError {
    /// The 1-based parameter position for binding failures.
    #[must_use]
    pub fn bind_position(&self) -> Option<usize> {
        match self {
            RowMapError::BindError { position, .. } => Some(*position),
            _ => None,
        }
    }
}
