use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;

const FINGERPRINT_LEN: usize = 10;

/// Short stable key derived from an Alertmanager group key.
///
/// Tickets carry it as the `jiralert:<fingerprint>` label, which is the only
/// link between an alert group and its ticket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupFingerprint(String);

impl GroupFingerprint {
    pub fn from_group_key(group_key: &str) -> Self {
        let digest = Sha1::digest(group_key.as_bytes());
        let mut hex = hex::encode(digest);
        hex.truncate(FINGERPRINT_LEN);
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Label attached to every ticket filed for this group.
    pub fn label(&self) -> String {
        format!("jiralert:{}", self.0)
    }
}

impl fmt::Display for GroupFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
