use serde::{Deserialize, Serialize};

/// Alertmanager's state for a group or a single alert, `"firing"` or `"resolved"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Firing,
    Resolved,
}
