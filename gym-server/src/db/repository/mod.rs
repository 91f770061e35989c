//! Repository Module
//!
//! Per-table `pub async fn` CRUD over `&SqlitePool`. Invariants are
//! enforced here through conditional writes (`UPDATE ... WHERE` checked
//! via `rows_affected()`) and the schema's partial unique indexes —
//! never through in-memory guards.

// Directory
pub mod equipment;
pub mod gym;
pub mod member;
pub mod membership;
pub mod trainer;

// Engine state
pub mod subscription;

// Ledger
pub mod expense;
pub mod ledger_transaction;
pub mod revenue;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Database(db)
                if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                RepoError::Duplicate(db.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                RepoError::Unavailable(err.to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
