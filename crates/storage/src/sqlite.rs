//! SQLite Repository

use crate::schema;
use crate::{NewReport, Report, ReportStore, ReportSummary, StorageError};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

/// Special path that selects a private in-memory database
const MEMORY_PATH: &str = ":memory:";

/// Repository backed by an embedded SQLite database
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Open (creating if needed) the database at `path`
    pub async fn connect(path: &str) -> Result<Self, StorageError> {
        if path == MEMORY_PATH {
            return Self::in_memory().await;
        }

        info!(path = %path, "Opening SQLite database");

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Ok(Self { pool })
    }

    /// Open a private in-memory database.
    ///
    /// Each SQLite memory connection is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self, StorageError> {
        debug!("Opening in-memory SQLite database");

        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Create the `reports` table if it does not exist yet
    pub async fn init_schema(&self) -> Result<(), StorageError> {
        debug!("Ensuring SQLite reports table");
        sqlx::query(schema::SQLITE_REPORTS_TABLE)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ReportStore for SqliteRepository {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ReportSummary>, StorageError> {
        let rows = sqlx::query_as::<_, ReportSummary>(schema::SELECT_SUMMARIES)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Report, StorageError> {
        sqlx::query_as::<_, Report>(schema::SELECT_REPORT)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    async fn insert(&self, report: &NewReport) -> Result<i64, StorageError> {
        let id = sqlx::query(schema::INSERT_REPORT)
            .bind(report.name())
            .bind(report.content())
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        debug!("Inserted report with ID {}", id);
        Ok(id)
    }

    async fn update(&self, id: i64, report: &NewReport) -> Result<(), StorageError> {
        let result = sqlx::query(schema::UPDATE_REPORT)
            .bind(report.name())
            .bind(report.content())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        debug!("Updated report {}", id);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        let result = sqlx::query(schema::DELETE_REPORT)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        debug!("Deleted report {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UpsertOutcome;

    async fn repo() -> SqliteRepository {
        let repo = SqliteRepository::in_memory().await.unwrap();
        repo.init_schema().await.unwrap();
        repo
    }

    fn draft(name: &str, content: &str) -> NewReport {
        NewReport::new(name, content).unwrap()
    }

    #[tokio::test]
    async fn test_report_lifecycle() {
        let repo = repo().await;

        let id = repo.upsert(None, &draft("Q1", "<doc>")).await.unwrap();
        let UpsertOutcome::Created(id) = id else {
            panic!("expected insert, got {id:?}");
        };
        assert!(id > 0);

        let report = repo.get(id).await.unwrap();
        assert_eq!(
            report,
            Report {
                id,
                report_name: "Q1".to_string(),
                report_content: "<doc>".to_string(),
            }
        );

        repo.delete(id).await.unwrap();
        assert!(matches!(repo.get(id).await, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let repo = repo().await;
        let id = repo.insert(&draft("Q1", "v1")).await.unwrap();

        repo.update(id, &draft("Q1 final", "v2")).await.unwrap();

        let report = repo.get(id).await.unwrap();
        assert_eq!(report.report_name, "Q1 final");
        assert_eq!(report.report_content, "v2");
    }

    #[tokio::test]
    async fn test_long_name_round_trip() {
        let repo = repo().await;
        let name = "n".repeat(300);
        let id = repo.insert(&draft(&name, "<doc>")).await.unwrap();

        assert_eq!(repo.get(id).await.unwrap().report_name, name);
    }

    #[tokio::test]
    async fn test_update_with_same_values() {
        let repo = repo().await;
        let id = repo.insert(&draft("Q1", "v1")).await.unwrap();

        repo.update(id, &draft("Q1", "v1")).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_rows_are_not_found() {
        let repo = repo().await;

        assert!(matches!(repo.get(99).await, Err(StorageError::NotFound)));
        assert!(matches!(
            repo.update(99, &draft("a", "b")).await,
            Err(StorageError::NotFound)
        ));
        assert!(matches!(repo.delete(99).await, Err(StorageError::NotFound)));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_orders_by_id() {
        let repo = repo().await;
        let a = repo.insert(&draft("alpha", "1")).await.unwrap();
        let b = repo.insert(&draft("beta", "2")).await.unwrap();

        let list = repo.list().await.unwrap();
        assert_eq!(
            list,
            vec![
                ReportSummary { id: a, report_name: "alpha".to_string() },
                ReportSummary { id: b, report_name: "beta".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn test_query_without_schema_fails() {
        let repo = SqliteRepository::in_memory().await.unwrap();

        let err = repo.list().await.unwrap_err();
        assert!(matches!(err, StorageError::QueryFailed(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_ping() {
        let repo = repo().await;
        repo.ping().await.unwrap();
        assert_eq!(repo.backend(), "sqlite");
    }
}
