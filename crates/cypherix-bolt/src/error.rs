//! Error types for the Bolt adapter.

use cypherix_core::IndexError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoltError {
    #[error("Bolt driver error: {0}")]
    Driver(#[from] neo4rs::Error),

    #[error("Cannot read column '{column}': {message}")]
    Column { column: String, message: String },

    #[error("Row holds neither a node nor a relationship in column '{0}'")]
    UnsupportedRow(String),

    #[error("Count statement returned no rows")]
    MissingCount,

    #[error("Failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

pub type BoltResult<T> = Result<T, BoltError>;

impl BoltError {
    pub fn column(column: &str, message: impl ToString) -> Self {
        Self::Column {
            column: column.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<BoltError> for IndexError {
    fn from(err: BoltError) -> Self {
        IndexError::execution(err)
    }
}
