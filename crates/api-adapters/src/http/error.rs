use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::DomainError;
use serde_json::json;
use tracing::error;

use crate::errors::{error_kind, status_code};

/// Wraps a `DomainError` so handlers can use `?`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(status_code(&self.0)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = match &self.0 {
            DomainError::Storage(detail) => {
                error!(%detail, "storage failure");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut body = json!({ "error": error_kind(&self.0), "message": message });
        if let DomainError::Forbidden(reason) = &self.0 {
            body["reason"] = json!(reason.as_str());
        }
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
