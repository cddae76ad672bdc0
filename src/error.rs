//! Error taxonomy for expense operations.
//!
//! Validation and not-found failures are the caller's fault and carry a
//! message that is safe to show. Persistence failures wrap the engine error
//! for logging only.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExpenseError {
    /// Malformed or missing input; storage was never touched
    #[error("{0}")]
    Validation(String),

    /// Delete target does not exist
    #[error("expense not found: {0}")]
    NotFound(i64),

    /// Any failure from the storage engine
    #[error("persistence error: {0}")]
    Persistence(#[from] anyhow::Error),
}

impl ExpenseError {
    pub fn validation(message: impl Into<String>) -> Self {
        ExpenseError::Validation(message.into())
    }
}

impl From<rusqlite::Error> for ExpenseError {
    fn from(err: rusqlite::Error) -> Self {
        ExpenseError::Persistence(err.into())
    }
}

pub type ExpenseResult<T> = std::result::Result<T, ExpenseError>;
