use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::handlers::IssuesResponse;

/// Failures caught by the transport before a request reaches the dispatcher.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("metrics are disabled")]
    MetricsDisabled,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::MetricsDisabled => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = IssuesResponse {
            status: self.to_string(),
            issues: None,
        };
        (self.status_code(), Json(body)).into_response()
    }
}
