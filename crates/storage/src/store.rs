//! Report Store Interface

use crate::{NewReport, Report, ReportSummary, StorageError, UpsertOutcome};
use async_trait::async_trait;

/// Datastore operations over the `reports` table.
///
/// Every method is a single, independent interaction with the backend.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Round trip to the datastore
    async fn ping(&self) -> Result<(), StorageError>;

    /// All reports without content, ordered by id
    async fn list(&self) -> Result<Vec<ReportSummary>, StorageError>;

    /// Fetch one report
    async fn get(&self, id: i64) -> Result<Report, StorageError>;

    /// Insert a report and return its generated id
    async fn insert(&self, report: &NewReport) -> Result<i64, StorageError>;

    /// Overwrite name and content of an existing report
    async fn update(&self, id: i64, report: &NewReport) -> Result<(), StorageError>;

    /// Remove a report
    async fn delete(&self, id: i64) -> Result<(), StorageError>;

    /// Update when an id is given, insert otherwise
    async fn upsert(
        &self,
        id: Option<i64>,
        report: &NewReport,
    ) -> Result<UpsertOutcome, StorageError> {
        match id {
            Some(id) => {
                self.update(id, report).await?;
                Ok(UpsertOutcome::Updated(id))
            }
            None => self.insert(report).await.map(UpsertOutcome::Created),
        }
    }
}
