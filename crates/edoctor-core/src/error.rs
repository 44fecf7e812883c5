use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, EDoctorError>;

#[derive(Debug, Error)]
pub enum EDoctorError {
    #[error("failed to load artifact {}: {reason}", path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    #[error("invalid value for field `{field}`: {reason}")]
    Validation { field: String, reason: String },

    #[error("dataset fetch failed with HTTP status {status}")]
    FetchStatus { status: u16 },

    #[error("dataset request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("dataset schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("dataset cannot be charted: {0}")]
    EmptyDataset(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub operation: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl EDoctorError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn artifact_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ArtifactLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::ArtifactLoad { .. } => "ARTIFACT_LOAD_FAILED",
            Self::Validation { .. } => "VALIDATION_FAILED",
            Self::FetchStatus { .. } | Self::Http(_) => "FETCH_FAILED",
            Self::SchemaMismatch(_) | Self::Csv(_) => "SCHEMA_MISMATCH",
            Self::EmptyDataset(_) => "EMPTY_DATASET",
            Self::Config(_) => "INVALID_CONFIG",
            Self::Json(_) => "JSON_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Errors the user can recover from by correcting input or retrying the view.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::FetchStatus { .. }
                | Self::Http(_)
                | Self::SchemaMismatch(_)
                | Self::Csv(_)
                | Self::EmptyDataset(_)
        )
    }

    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::FetchStatus { .. } | Self::Http(_))
    }

    pub fn to_payload(&self, operation: impl Into<String>) -> ErrorPayload {
        let details = match self {
            Self::Validation { field, .. } => Some(serde_json::json!({ "field": field })),
            Self::FetchStatus { status } => Some(serde_json::json!({ "status": status })),
            Self::ArtifactLoad { path, .. } => {
                Some(serde_json::json!({ "path": path.display().to_string() }))
            }
            _ => None,
        };
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            operation: operation.into(),
            trace_id: Uuid::new_v4().to_string(),
            details,
        }
    }
}
