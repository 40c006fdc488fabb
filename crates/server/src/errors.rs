use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use common::response::ApiResponse;
use service::errors::{ServiceError, INTERNAL_ERROR_MESSAGE};

/// Handler error rendered as a `fail` envelope.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self { Self::new(StatusCode::BAD_REQUEST, message) }

    pub fn not_found(message: impl Into<String>) -> Self { Self::new(StatusCode::NOT_FOUND, message) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        ApiResponse::<()>::fail()
            .message(self.message)
            .status_code(self.status)
            .into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match &e {
            ServiceError::NotFound(m) => Self::not_found(m.clone()),
            ServiceError::Import(m) => Self::bad_request(m.clone()),
            _ if e.is_validation() => Self::bad_request(e.message()),
            _ => {
                error!(error = %e, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        let status = match r.status() {
            StatusCode::UNPROCESSABLE_ENTITY => StatusCode::BAD_REQUEST,
            s => s,
        };
        Self::new(status, r.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(r: QueryRejection) -> Self { Self::bad_request(r.body_text()) }
}

impl From<PathRejection> for ApiError {
    fn from(r: PathRejection) -> Self { Self::bad_request(r.body_text()) }
}

impl From<MultipartRejection> for ApiError {
    fn from(r: MultipartRejection) -> Self { Self::new(r.status(), r.body_text()) }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self { Self::new(e.status(), e.body_text()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let nf: ApiError = ServiceError::NotFound("data alumni tidak ditemukan".into()).into();
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "data alumni tidak ditemukan");

        let bad: ApiError = ServiceError::Validation("email tidak valid: x".into()).into();
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);

        let imp: ApiError = ServiceError::Import("kolom nama tidak ditemukan".into()).into();
        assert_eq!((imp.status, imp.message.as_str()), (StatusCode::BAD_REQUEST, "kolom nama tidak ditemukan"));

        let db: ApiError = ServiceError::Db("connection refused".into()).into();
        assert_eq!(db.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!db.message.contains("connection refused"));
    }
}
