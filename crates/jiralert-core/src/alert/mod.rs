pub mod fingerprint;
pub mod status;
pub mod version;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::error::DomainError;

pub use fingerprint::GroupFingerprint;
pub use status::Status;
pub use version::SchemaVersion;

const ALERT_HASH_LEN: usize = 8;

/// Alertmanager webhook notification for one alert group (versions 3 and 4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertGroupPayload {
    pub version: String,
    pub group_key: String,
    pub status: Status,
    #[serde(default)]
    pub receiver: String,
    #[serde(default)]
    pub group_labels: BTreeMap<String, String>,
    #[serde(default)]
    pub common_labels: BTreeMap<String, String>,
    #[serde(default)]
    pub common_annotations: BTreeMap<String, String>,
    #[serde(default, rename = "externalURL")]
    pub external_url: String,
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

impl AlertGroupPayload {
    pub fn schema_version(&self) -> Result<SchemaVersion, DomainError> {
        SchemaVersion::parse(&self.version)
    }

    pub fn is_resolved(&self) -> bool {
        self.status == Status::Resolved
    }

    pub fn fingerprint(&self) -> GroupFingerprint {
        GroupFingerprint::from_group_key(&self.group_key)
    }

    /// Project and issue type carried in `commonLabels`, for the generic endpoint.
    pub fn routing(&self) -> Result<(&str, &str), DomainError> {
        let project = self.common_labels.get("project");
        let issue_type = self.common_labels.get("issue_type");
        match (project, issue_type) {
            (Some(p), Some(t)) if !p.is_empty() && !t.is_empty() => Ok((p.as_str(), t.as_str())),
            _ => Err(DomainError::MissingRouting),
        }
    }

    /// Alerts paired with their content hash, sorted by that hash so the
    /// order survives re-deliveries that shuffle the alert list.
    pub fn alerts_by_hash(&self) -> Vec<(String, &Alert)> {
        let mut hashed: Vec<_> = self.alerts.iter().map(|a| (a.content_hash(), a)).collect();
        hashed.sort_by(|a, b| a.0.cmp(&b.0));
        hashed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "generatorURL")]
    pub generator_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

// Field order is alphabetical so the serialized form has sorted keys.
#[derive(Serialize)]
struct HashedAlert<'a> {
    annotations: &'a BTreeMap<String, String>,
    fingerprint: &'a Option<String>,
    #[serde(rename = "generatorURL")]
    generator_url: &'a str,
    labels: &'a BTreeMap<String, String>,
    status: &'a Option<Status>,
}

impl Alert {
    /// Short hash over everything but the timestamps, which change on every
    /// notification.
    pub fn content_hash(&self) -> String {
        let stable = HashedAlert {
            annotations: &self.annotations,
            fingerprint: &self.fingerprint,
            generator_url: &self.generator_url,
            labels: &self.labels,
            status: &self.status,
        };
        let bytes = serde_json::to_vec(&stable).unwrap_or_default();
        let mut hex = hex::encode(Sha1::digest(&bytes));
        hex.truncate(ALERT_HASH_LEN);
        hex
    }
}
