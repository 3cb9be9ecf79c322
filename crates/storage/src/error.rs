//! Storage error type.

use thiserror::Error;

/// Result type alias using our StoreError type.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Constraint violation (unique, foreign key, check).
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation()
                    || db_err.is_foreign_key_violation()
                    || db_err.is_check_violation() =>
            {
                Self::ConstraintViolation(db_err.to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}
