//! HTTP handlers. Bodies are decoded here so malformed JSON gets the same
//! `{status, issues}` envelope as every other reply.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use jiralert_core::alert::AlertGroupPayload;
use jiralert_core::history::HistoryEntry;
use jiralert_core::outcome::{IssueReport, Reply};

use crate::error::ApiError;
use crate::routes::ServerState;

#[derive(Debug, Serialize, Deserialize)]
pub struct IssuesResponse {
    pub status: String,
    pub issues: Option<IssueReport>,
}

/// A dispatcher reply sent with its own status code.
pub struct ReplyResponse(pub Reply);

impl IntoResponse for ReplyResponse {
    fn into_response(self) -> Response {
        let Reply {
            status,
            code,
            issues,
        } = self.0;
        let code = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = IssuesResponse { status, issues };
        (code, Json(body)).into_response()
    }
}

fn decode(body: &Bytes) -> Result<AlertGroupPayload, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidPayload(e.to_string()))
}

/// Handle POST /issues - routing taken from `commonLabels`.
pub async fn post_issues(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<ReplyResponse, ApiError> {
    let payload = decode(&body)?;
    Ok(ReplyResponse(state.filer.post_issues(payload).await))
}

/// Handle POST /issues/{project}/{issue_type}.
pub async fn post_issues_with_project(
    State(state): State<Arc<ServerState>>,
    Path((project, issue_type)): Path<(String, String)>,
    body: Bytes,
) -> Result<ReplyResponse, ApiError> {
    let payload = decode(&body)?;
    let reply = state
        .filer
        .post_issues_with_project(&project, &issue_type, payload)
        .await;
    Ok(ReplyResponse(reply))
}

pub async fn health(State(state): State<Arc<ServerState>>) -> (StatusCode, &'static str) {
    if state.filer.is_ready() {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Not ready yet")
    }
}

pub async fn history(State(state): State<Arc<ServerState>>) -> Json<Vec<HistoryEntry>> {
    Json(state.filer.history())
}

pub async fn metrics(State(state): State<Arc<ServerState>>) -> Result<String, ApiError> {
    state
        .prometheus
        .as_ref()
        .map(|handle| handle.render())
        .ok_or(ApiError::MetricsDisabled)
}
