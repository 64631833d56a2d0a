//! MySQL Repository

use crate::schema;
use crate::{NewReport, Report, ReportStore, ReportSummary, StorageError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::{debug, info};

/// Connection settings for the MySQL backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MySqlSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

impl Default for MySqlSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "reports".to_string(),
            max_connections: 10,
        }
    }
}

impl MySqlSettings {
    fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);

        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }
}

/// Repository backed by a MySQL connection pool
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Build the pool without connecting; connections are opened on first use
    pub fn connect_lazy(settings: &MySqlSettings) -> Self {
        info!(
            host = %settings.host,
            port = settings.port,
            database = %settings.database,
            max_connections = settings.max_connections,
            "Creating MySQL connection pool"
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_lazy_with(settings.connect_options());

        Self { pool }
    }

    /// Create the `reports` table if it does not exist yet
    pub async fn init_schema(&self) -> Result<(), StorageError> {
        debug!("Ensuring MySQL reports table");
        sqlx::query(schema::MYSQL_REPORTS_TABLE)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ReportStore for MySqlRepository {
    fn backend(&self) -> &'static str {
        "mysql"
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
        let result = sqlx::query(schema::INSERT_REPORT)
            .bind(report.name())
            .bind(report.content())
            .execute(&self.pool)
            .await?;

        let id = i64::try_from(result.last_insert_id()).map_err(|_| {
            StorageError::QueryFailed(format!(
                "Generated id {} out of range",
                result.last_insert_id()
            ))
        })?;

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

        if result.rows_affected() > 0 {
            debug!("Updated report {}", id);
            return Ok(());
        }

        // MySQL counts changed rows, not matched rows, so an update that
        // writes identical values reports zero.
        let exists = sqlx::query(schema::REPORT_EXISTS)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .is_some();

        if exists {
            debug!("Report {} unchanged by update", id);
            Ok(())
        } else {
            Err(StorageError::NotFound)
        }
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
