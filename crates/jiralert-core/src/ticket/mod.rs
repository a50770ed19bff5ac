pub mod description;
pub mod key;
pub mod tags;
pub mod transition;

use serde::{Deserialize, Serialize};

pub use description::{initial_description, merge_description, DESCRIPTION_BOUNDARY};
pub use key::compare_keys;
pub use tags::{build_tags, TagSet};
pub use transition::{pick_resolve_transition, Transition};

/// Read view of a remote ticket, fetched fresh for every reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub key: String,
    pub permalink: String,
    pub summary: String,
    pub description: Option<String>,
    pub labels: Vec<String>,
}

impl Ticket {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}
