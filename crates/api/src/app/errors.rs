use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use workforce_core::{DomainError, EmploymentCode};
use workforce_infra::StoreError;
use workforce_projects::ProjectId;

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Domain(e) => domain_error_to_response(e),
        StoreError::Backend { .. } => {
            tracing::error!(error = %err, "storage failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "storage backend failure",
            )
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        DomainError::Validation(_) => json_error(StatusCode::BAD_REQUEST, "validation_error", message),
        DomainError::InvalidId(_) => json_error(StatusCode::BAD_REQUEST, "invalid_id", message),
        DomainError::Conflict { .. } => json_error(StatusCode::CONFLICT, "conflict", message),
        DomainError::NotFound { .. } => json_error(StatusCode::NOT_FOUND, "not_found", message),
        DomainError::InvalidCredentials => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", message)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_code(raw: &str) -> Result<EmploymentCode, axum::response::Response> {
    EmploymentCode::parse(raw).map_err(domain_error_to_response)
}

pub fn parse_project_id(raw: &str) -> Result<ProjectId, axum::response::Response> {
    raw.parse::<ProjectId>().map_err(domain_error_to_response)
}
