use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use burrow_core::TinyUrlError;
use serde_json::json;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Error wrapper mapping service errors onto HTTP statuses.
pub struct AppError(TinyUrlError);

impl From<TinyUrlError> for AppError {
    fn from(err: TinyUrlError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TinyUrlError::InvalidKey | TinyUrlError::InvalidTargetUrl => StatusCode::BAD_REQUEST,
            TinyUrlError::KeyConflict(_) => StatusCode::CONFLICT,
            TinyUrlError::NotFound(_) => StatusCode::NOT_FOUND,
            TinyUrlError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "request failed");
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
