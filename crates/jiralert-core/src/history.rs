use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::alert::AlertGroupPayload;
use crate::outcome::Reply;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One handled webhook delivery, kept for the history view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub recorded_at: DateTime<Utc>,
    pub project: Option<String>,
    pub issue_type: Option<String>,
    pub request: AlertGroupPayload,
    pub response: Reply,
}

impl HistoryEntry {
    pub fn new(
        project: Option<String>,
        issue_type: Option<String>,
        request: AlertGroupPayload,
        response: Reply,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            recorded_at: now,
            project,
            issue_type,
            request,
            response,
        }
    }
}
