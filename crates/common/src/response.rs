//! Uniform response envelope shared by every endpoint.
//!
//! ```json
//! { "status": "success", "message": "...", "data": {...}, "pagination": { "next": null, "previous": null } }
//! ```
//! `message`, `data` and `pagination` are omitted when unset.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Fail,
}

/// Forward/backward cursors of a cursor-paginated listing. Either side is
/// `null` at a boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub next: Option<String>,
    pub previous: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip)]
    code: StatusCode,
}

impl<T> ApiResponse<T> {
    pub fn success() -> Self {
        Self::with_status(Status::Success, StatusCode::OK)
    }

    pub fn fail() -> Self {
        Self::with_status(Status::Fail, StatusCode::BAD_REQUEST)
    }

    fn with_status(status: Status, code: StatusCode) -> Self {
        Self { status, message: None, data: None, pagination: None, code }
    }

    pub fn data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn pagination(mut self, next: Option<String>, previous: Option<String>) -> Self {
        self.pagination = Some(Pagination { next, previous });
        self
    }

    /// Override the HTTP status sent alongside the envelope.
    pub fn status_code(mut self, code: StatusCode) -> Self {
        self.code = code;
        self
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let code = self.code;
        (code, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_omits_unset_members() {
        let body = serde_json::to_value(ApiResponse::success().data(1)).unwrap();
        assert_eq!(body, serde_json::json!({"status": "success", "data": 1}));
    }

    #[test]
    fn fail_envelope_carries_message_and_status() {
        let resp = ApiResponse::<()>::fail().message("data alumni tidak ditemukan").status_code(StatusCode::NOT_FOUND);
        assert_eq!(resp.code(), StatusCode::NOT_FOUND);
        let body = serde_json::to_value(&resp).unwrap();
        assert_eq!(body["status"], "fail");
        assert_eq!(body["message"], "data alumni tidak ditemukan");
        assert!(body.get("data").is_none());
    }

    #[test]
    fn pagination_keeps_null_cursors() {
        let body = serde_json::to_value(ApiResponse::success().data(Vec::<u8>::new()).pagination(None, None)).unwrap();
        assert!(body["pagination"]["next"].is_null());
        assert!(body["pagination"]["previous"].is_null());
    }
}
