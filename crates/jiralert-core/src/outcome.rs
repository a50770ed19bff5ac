use serde::{Deserialize, Serialize};

/// Permalinks touched by one reconciliation, grouped by what happened to them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueReport {
    pub created: Vec<String>,
    pub found: Vec<String>,
    pub updated: Vec<String>,
    pub resolved: Vec<String>,
}

impl IssueReport {
    pub fn is_noop(&self) -> bool {
        self.created.is_empty()
            && self.found.is_empty()
            && self.updated.is_empty()
            && self.resolved.is_empty()
    }
}

/// Status line, HTTP-style code and optional report returned for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub status: String,
    pub code: u16,
    pub issues: Option<IssueReport>,
}

impl Reply {
    pub fn ok(issues: IssueReport) -> Self {
        Self {
            status: "OK".into(),
            code: 200,
            issues: Some(issues),
        }
    }

    pub fn accepted() -> Self {
        Self {
            status: "OK (async)".into(),
            code: 201,
            issues: None,
        }
    }

    pub fn error(status: impl Into<String>, code: u16) -> Self {
        Self {
            status: status.into(),
            code,
            issues: None,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}
