//! API Error Mapping
//!
//! Every failure is converted into an HTTP status and a JSON message at the
//! request boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use storage::StorageError;
use thiserror::Error;
use tracing::{error, warn};

use crate::telemetry;

/// Report operation exposed over HTTP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Save,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Save => "save",
            Operation::Delete => "delete",
        }
    }

    fn not_found_message(&self) -> &'static str {
        match self {
            Operation::List | Operation::Get => "Report not found",
            Operation::Save => "Report not found for update",
            Operation::Delete => "Report not found for deletion",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            Operation::List => "Error fetching reports",
            Operation::Get => "Error fetching report",
            Operation::Save => "Error saving/updating report",
            Operation::Delete => "Error deleting report",
        }
    }
}

/// Request failure
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client sent missing or malformed fields
    #[error("{message}")]
    Validation {
        operation: Operation,
        message: String,
    },

    /// No report with the requested id
    #[error("{}", .operation.not_found_message())]
    NotFound { operation: Operation },

    /// Datastore failure
    #[error("{}: {source}", .operation.failure_message())]
    Store {
        operation: Operation,
        #[source]
        source: StorageError,
    },
}

impl ApiError {
    /// Classify a storage error for the given operation
    pub fn from_storage(operation: Operation, err: StorageError) -> Self {
        match err {
            StorageError::Validation(message) => ApiError::Validation { operation, message },
            StorageError::NotFound => ApiError::NotFound { operation },
            source => ApiError::Store { operation, source },
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            ApiError::Validation { operation, .. }
            | ApiError::NotFound { operation }
            | ApiError::Store { operation, .. } => *operation,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> serde_json::Value {
        match self {
            ApiError::Validation { message, .. } => json!({ "message": message }),
            ApiError::NotFound { operation } => {
                json!({ "message": operation.not_found_message() })
            }
            ApiError::Store { operation, source } => json!({
                "message": operation.failure_message(),
                "error": source.to_string(),
            }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let operation = self.operation();

        if status.is_server_error() {
            error!(operation = operation.as_str(), error = %self, "Report request failed");
        } else {
            warn!(operation = operation.as_str(), status = status.as_u16(), error = %self, "Report request rejected");
        }

        telemetry::record_request(operation, status);

        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let validation = ApiError::from_storage(
            Operation::Save,
            StorageError::Validation("Report name and content are required.".into()),
        );
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let missing = ApiError::from_storage(Operation::Get, StorageError::NotFound);
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let down = ApiError::from_storage(
            Operation::List,
            StorageError::Unavailable("connection refused".into()),
        );
        assert_eq!(down.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let failed = ApiError::from_storage(
            Operation::Delete,
            StorageError::QueryFailed("syntax".into()),
        );
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_messages_per_operation() {
        let body = |op| ApiError::NotFound { operation: op }.body();
        assert_eq!(body(Operation::Get)["message"], "Report not found");
        assert_eq!(body(Operation::Save)["message"], "Report not found for update");
        assert_eq!(body(Operation::Delete)["message"], "Report not found for deletion");
    }

    #[test]
    fn test_store_error_body_includes_detail() {
        let err = ApiError::from_storage(
            Operation::Save,
            StorageError::QueryFailed("table missing".into()),
        );
        let body = err.body();
        assert_eq!(body["message"], "Error saving/updating report");
        assert_eq!(body["error"], "Query failed: table missing");
    }
}
