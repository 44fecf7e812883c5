use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use edoctor_core::EDoctorError;

pub fn status_for_error(err: &EDoctorError) -> StatusCode {
    match err {
        EDoctorError::Validation { .. } => StatusCode::BAD_REQUEST,
        EDoctorError::FetchStatus { .. }
        | EDoctorError::Http(_)
        | EDoctorError::SchemaMismatch(_)
        | EDoctorError::Csv(_)
        | EDoctorError::EmptyDataset(_) => StatusCode::BAD_GATEWAY,
        EDoctorError::ArtifactLoad { .. }
        | EDoctorError::Config(_)
        | EDoctorError::Json(_)
        | EDoctorError::Io(_)
        | EDoctorError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "handlers naturally own error values from `Result` and pass them through"
)]
pub fn api_error_response(err: EDoctorError, operation: &str) -> Response {
    let status = status_for_error(&err);
    log_flow_error(&err, operation);
    (status, Json(err.to_payload(operation))).into_response()
}

pub fn log_flow_error(err: &EDoctorError, operation: &str) {
    if err.is_recoverable() {
        tracing::warn!(operation, code = err.code(), error = %err, "request failed");
    } else {
        tracing::error!(operation, code = err.code(), error = %err, "request failed");
    }
}

pub fn blocking_task_failed(err: &tokio::task::JoinError) -> EDoctorError {
    EDoctorError::Internal(format!("blocking task failed: {err}"))
}
