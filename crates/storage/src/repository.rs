//! In-Memory Repository

use crate::{NewReport, Report, ReportStore, ReportSummary, StorageError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Rows keyed by id, plus the auto-increment counter
struct Table {
    rows: BTreeMap<i64, Report>,
    next_id: i64,
}

/// Repository that keeps reports in process memory.
///
/// Ids are handed out like an auto-increment column: strictly increasing,
/// never reused after deletion.
pub struct MemoryRepository {
    table: Mutex<Table>,
}

impl MemoryRepository {
    /// Create an empty in-memory repository
    pub fn new() -> Self {
        info!("Creating in-memory report repository");
        Self {
            table: Mutex::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>, StorageError> {
        self.table
            .lock()
            .map_err(|e| StorageError::Unavailable(format!("Lock error: {}", e)))
    }

    /// Number of stored reports; counts rows even after a writer panicked
    pub fn len(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .rows
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportStore for MemoryRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.lock().map(|_| ())
    }

    async fn list(&self) -> Result<Vec<ReportSummary>, StorageError> {
        let table = self.lock()?;
        Ok(table.rows.values().map(ReportSummary::from).collect())
    }

    async fn get(&self, id: i64) -> Result<Report, StorageError> {
        let table = self.lock()?;
        table.rows.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn insert(&self, report: &NewReport) -> Result<i64, StorageError> {
        let mut table = self.lock()?;

        let id = table.next_id;
        table.next_id += 1;
        table.rows.insert(id, report.clone().into_report(id));

        debug!("Inserted report with ID {}", id);
        Ok(id)
    }

    async fn update(&self, id: i64, report: &NewReport) -> Result<(), StorageError> {
        let mut table = self.lock()?;

        let row = table.rows.get_mut(&id).ok_or(StorageError::NotFound)?;
        *row = report.clone().into_report(id);

        debug!("Updated report {}", id);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        let mut table = self.lock()?;

        table.rows.remove(&id).ok_or(StorageError::NotFound)?;

        debug!("Deleted report {}", id);
        Ok(())
    }
}
