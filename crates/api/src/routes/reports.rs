//! Report Routes

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::{NewReport, Report, ReportSummary, StorageError};
use tracing::{debug, info};

use crate::error::{ApiError, Operation};
use crate::telemetry;
use crate::AppState;

const FIELDS_REQUIRED: &str = "Report name and content are required.";

/// Report id as sent by clients: a JSON number or a numeric string.
///
/// Any other JSON value is kept so it can be rejected as an invalid id
/// instead of failing the whole body.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReportId {
    Number(i64),
    Flag(bool),
    Text(String),
    Other(serde_json::Value),
}

/// Body of a save request
#[derive(Debug, Deserialize)]
pub struct SaveReportRequest {
    #[serde(default)]
    pub id: Option<ReportId>,
    #[serde(default)]
    pub report_name: Option<String>,
    #[serde(default)]
    pub report_content: Option<String>,
}

impl SaveReportRequest {
    /// Validate the body into an optional target id and a report payload.
    ///
    /// A missing, null, zero, false or empty-string id selects insert.
    pub fn into_parts(self) -> Result<(Option<i64>, NewReport), ApiError> {
        let validation = |message: String| ApiError::Validation {
            operation: Operation::Save,
            message,
        };

        let report = NewReport::new(
            self.report_name.unwrap_or_default(),
            self.report_content.unwrap_or_default(),
        )
        .map_err(|err| ApiError::from_storage(Operation::Save, err))?;

        let id = match self.id {
            None | Some(ReportId::Number(0)) | Some(ReportId::Flag(false)) => None,
            Some(ReportId::Number(id)) => Some(id),
            Some(ReportId::Flag(true)) => {
                return Err(validation("Invalid report id: true".to_string()))
            }
            Some(ReportId::Other(value)) => {
                return Err(validation(format!("Invalid report id: {}", value)))
            }
            Some(ReportId::Text(text)) if text.is_empty() => None,
            Some(ReportId::Text(text)) => Some(
                text.trim()
                    .parse::<i64>()
                    .map_err(|_| validation(format!("Invalid report id: {}", text)))?,
            ),
        };

        Ok((id, report))
    }
}

/// Response for a save request
#[derive(Debug, Serialize)]
pub struct SaveReportResponse {
    pub message: &'static str,
    #[serde(rename = "reportId")]
    pub report_id: i64,
}

/// Plain acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Path ids that are not integers cannot match any row
fn parse_id(raw: &str, operation: Operation) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::NotFound { operation })
}

/// List reports (id and name only)
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ReportSummary>>, ApiError> {
    let reports = state
        .store
        .list()
        .await
        .map_err(|e| ApiError::from_storage(Operation::List, e))?;

    debug!(count = reports.len(), "Listed reports");
    telemetry::record_request(Operation::List, StatusCode::OK);
    Ok(Json(reports))
}

/// Get a single report by id
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Report>, ApiError> {
    let id = parse_id(&raw_id, Operation::Get)?;

    let report = state
        .store
        .get(id)
        .await
        .map_err(|e| ApiError::from_storage(Operation::Get, e))?;

    telemetry::record_request(Operation::Get, StatusCode::OK);
    Ok(Json(report))
}

/// Save a report: update when the body carries an id, insert otherwise
pub async fn save_report(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SaveReportRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SaveReportResponse>), ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected report body");
        ApiError::from_storage(
            Operation::Save,
            StorageError::Validation(FIELDS_REQUIRED.to_string()),
        )
    })?;

    let (id, report) = request.into_parts()?;

    let outcome = state
        .store
        .upsert(id, &report)
        .await
        .map_err(|e| ApiError::from_storage(Operation::Save, e))?;

    let (status, message) = if outcome.is_created() {
        (StatusCode::CREATED, "Report saved successfully")
    } else {
        (StatusCode::OK, "Report updated successfully")
    };

    info!(id = outcome.id(), created = outcome.is_created(), "Report saved");
    telemetry::record_request(Operation::Save, status);

    Ok((
        status,
        Json(SaveReportResponse {
            message,
            report_id: outcome.id(),
        }),
    ))
}

/// Delete a report by id
pub async fn delete_report(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&raw_id, Operation::Delete)?;

    state
        .store
        .delete(id)
        .await
        .map_err(|e| ApiError::from_storage(Operation::Delete, e))?;

    info!(id, "Report deleted");
    telemetry::record_request(Operation::Delete, StatusCode::OK);

    Ok(Json(MessageResponse {
        message: "Report deleted successfully",
    }))
}
