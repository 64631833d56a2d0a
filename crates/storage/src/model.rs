//! Report Records

use crate::StorageError;
use serde::{Deserialize, Serialize};

/// A stored report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Report {
    pub id: i64,
    pub report_name: String,
    pub report_content: String,
}

/// Report listing entry; content is left out to keep listings small
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReportSummary {
    pub id: i64,
    pub report_name: String,
}

impl From<&Report> for ReportSummary {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id,
            report_name: report.report_name.clone(),
        }
    }
}

/// Validated name and content, ready to be written.
///
/// Both fields are guaranteed non-empty, so a store that only accepts
/// `NewReport` can never persist a report without a name or content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    name: String,
    content: String,
}

impl NewReport {
    /// Validate and build a report payload
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let name = name.into();
        let content = content.into();

        if name.is_empty() || content.is_empty() {
            return Err(StorageError::Validation(
                "Report name and content are required.".to_string(),
            ));
        }

        Ok(Self { name, content })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Attach an id, producing the full stored record
    pub fn into_report(self, id: i64) -> Report {
        Report {
            id,
            report_name: self.name,
            report_content: self.content,
        }
    }
}

/// Result of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new row was inserted with this id
    Created(i64),
    /// The existing row with this id was overwritten
    Updated(i64),
}

impl UpsertOutcome {
    pub fn id(&self) -> i64 {
        match self {
            UpsertOutcome::Created(id) | UpsertOutcome::Updated(id) => *id,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, UpsertOutcome::Created(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_rejects_empty_fields() {
        assert!(matches!(
            NewReport::new("", "<doc>"),
            Err(StorageError::Validation(_))
        ));
        assert!(matches!(
            NewReport::new("Q1", ""),
            Err(StorageError::Validation(_))
        ));
    }

    #[test]
    fn test_whitespace_is_not_empty() {
        let report = NewReport::new(" ", " ").unwrap();
        assert_eq!(report.name(), " ");
    }

    #[test]
    fn test_into_report() {
        let report = NewReport::new("Q1", "<doc>").unwrap().into_report(7);
        assert_eq!(report.id, 7);
        assert_eq!(report.report_name, "Q1");
        assert_eq!(ReportSummary::from(&report).report_name, "Q1");
    }

    #[test]
    fn test_upsert_outcome() {
        assert!(UpsertOutcome::Created(3).is_created());
        assert!(!UpsertOutcome::Updated(3).is_created());
        assert_eq!(UpsertOutcome::Updated(9).id(), 9);
    }
}
