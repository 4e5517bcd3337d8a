use axum::response::{IntoResponse, Response};
use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;
use tracing::error;

use crate::error::BlogError;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: Option<String>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub code: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), code: None }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.message, code: self.code };
        (self.status, Json(body)).into_response()
    }
}

impl From<BlogError> for AppError {
    fn from(e: BlogError) -> Self {
        match e {
            BlogError::NotFound { .. } => AppError::new(StatusCode::NOT_FOUND, e.to_string()).with_code("not_found"),
            BlogError::Validation(msg) => AppError::new(StatusCode::BAD_REQUEST, msg).with_code("validation_error"),
            BlogError::Conflict(_) => AppError::new(StatusCode::CONFLICT, e.to_string()).with_code("conflict"),
            BlogError::Storage(msg) => {
                error!("storage failure: {}", msg);
                AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "storageError").with_code("storage_error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let nf: AppError = BlogError::NotFound { entity: "blog", id: 4 }.into();
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.code.as_deref(), Some("not_found"));

        let bad: AppError = BlogError::validation("title can't be empty").into();
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.message, "title can't be empty");

        let conflict: AppError = BlogError::Conflict(4).into();
        assert_eq!(conflict.status, StatusCode::CONFLICT);

        let storage: AppError = BlogError::Storage("connection reset".into()).into();
        assert_eq!(storage.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(storage.message, "storageError");
    }
}
