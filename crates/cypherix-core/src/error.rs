//! Error types for the query layer.

use thiserror::Error;

/// Errors surfaced by index queries and result streams.
///
/// A predicate kind without a registered factory is not an error: the
/// clause is logged and dropped while the statement is built.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Query execution failed: {0}")]
    Execution(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Result stream exhausted")]
    Exhausted,

    #[error("Cannot map record: {0}")]
    Mapping(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for query layer operations.
pub type IndexResult<T> = Result<T, IndexError>;

impl IndexError {
    /// Wrap a driver or session failure.
    pub fn execution(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Execution(err.into())
    }

    pub fn mapping(msg: impl Into<String>) -> Self {
        Self::Mapping(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
