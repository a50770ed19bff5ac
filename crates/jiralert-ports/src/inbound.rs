use async_trait::async_trait;

use jiralert_core::alert::AlertGroupPayload;
use jiralert_core::history::HistoryEntry;
use jiralert_core::outcome::Reply;

/// Entry points the webhook transport drives.
#[async_trait]
pub trait IssueFiler: Send + Sync {
    /// Project and issue type come from `commonLabels`.
    async fn post_issues(&self, payload: AlertGroupPayload) -> Reply;
    async fn post_issues_with_project(
        &self,
        project: &str,
        issue_type: &str,
        payload: AlertGroupPayload,
    ) -> Reply;
    fn is_ready(&self) -> bool;
    /// Most recent first.
    fn history(&self) -> Vec<HistoryEntry>;
}
