use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use queuewatch_core::alerts::InvalidThresholdInput;

use crate::session_store::SessionError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    ServiceUnavailable(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(m) | Self::ServiceUnavailable(m) => write!(f, "{m}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            Self::ServiceUnavailable(m) => (StatusCode::SERVICE_UNAVAILABLE, m.clone()),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<InvalidThresholdInput> for AppError {
    fn from(err: InvalidThresholdInput) -> Self {
        tracing::debug!(error = %err, "Rejected threshold update");
        Self::BadRequest("Please enter valid numbers for all fields".to_string())
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::AtCapacity(_) => Self::ServiceUnavailable(err.to_string()),
        }
    }
}
