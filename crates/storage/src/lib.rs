//! Storage Layer
//!
//! Report persistence behind the [`ReportStore`] trait, with MySQL,
//! SQLite and in-memory repositories.

mod model;
mod mysql;
mod repository;
mod schema;
mod sqlite;
mod store;

pub use model::{NewReport, Report, ReportSummary, UpsertOutcome};
pub use mysql::{MySqlRepository, MySqlSettings};
pub use repository::MemoryRepository;
pub use sqlite::SqliteRepository;
pub use store::ReportStore;

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Report fields failed validation; nothing was written
    #[error("Validation error: {0}")]
    Validation(String),
    /// No row matched the requested id
    #[error("Record not found")]
    NotFound,
    /// The datastore could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    /// The datastore rejected or failed the statement
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StorageError::NotFound,
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::WorkerCrashed => StorageError::Unavailable(err.to_string()),
            other => StorageError::QueryFailed(other.to_string()),
        }
    }
}
