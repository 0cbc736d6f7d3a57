use crate::Error;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Handler error: a gateway [`Error`] rendered as `{"error": message}`.
#[derive(Debug)]
pub struct AppError(pub Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::Validation(rejection.body_text()))
    }
}

/// HTTP status for a gateway error; batch aborts take the status of their cause.
pub fn status_code(err: &Error) -> StatusCode {
    match err.root() {
        Error::Validation(_) | Error::Serialization(_) => StatusCode::BAD_REQUEST,
        Error::NotFound { .. } | Error::ResourceNotFound(_) => StatusCode::NOT_FOUND,
        Error::Conflict(_) => StatusCode::CONFLICT,
        Error::Unprocessed { .. } => StatusCode::SERVICE_UNAVAILABLE,
        Error::Transport(_) | Error::PaginationLimit { .. } | Error::BatchAborted { .. } => {
            StatusCode::BAD_GATEWAY
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_code(&self.0);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, "request rejected");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}
