use std::future::Future;
use std::time::Instant;

use async_trait::async_trait;

use jiralert_core::ticket::{Ticket, Transition};
use jiralert_ports::error::PortError;
use jiralert_ports::outbound::TicketStore;
use jiralert_ports::types::{NewTicket, TicketQuery, TicketUpdate};

pub const JIRA_REQUEST_LATENCY: &str = "jiralert_jira_request_latency_seconds";
pub const JIRA_ERRORS: &str = "jiralert_jira_errors_total";

/// Records latency and error counts for every call to the wrapped store,
/// labelled by action.
pub struct InstrumentedStore<S> {
    inner: S,
}

impl<S> InstrumentedStore<S>
where
    S: TicketStore,
{
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

async fn observe<T, F>(action: &'static str, call: F) -> Result<T, PortError>
where
    F: Future<Output = Result<T, PortError>>,
{
    let started = Instant::now();
    let result = call.await;
    metrics::histogram!(JIRA_REQUEST_LATENCY, "action" => action)
        .record(started.elapsed().as_secs_f64());
    if let Err(e) = &result {
        metrics::counter!(JIRA_ERRORS, "action" => action).increment(1);
        tracing::debug!(action, error = %e, "ticket system call failed");
    }
    result
}

#[async_trait]
impl<S> TicketStore for InstrumentedStore<S>
where
    S: TicketStore,
{
    async fn connect(&self) -> Result<(), PortError> {
        observe("connect", self.inner.connect()).await
    }

    async fn search(&self, query: &TicketQuery) -> Result<Vec<Ticket>, PortError> {
        observe("search", self.inner.search(query)).await
    }

    async fn create(&self, ticket: &NewTicket) -> Result<Ticket, PortError> {
        observe("create", self.inner.create(ticket)).await
    }

    async fn update(&self, key: &str, update: &TicketUpdate) -> Result<(), PortError> {
        observe("update", self.inner.update(key, update)).await
    }

    async fn transitions(&self, key: &str) -> Result<Vec<Transition>, PortError> {
        observe("transitions", self.inner.transitions(key)).await
    }

    async fn transition(&self, key: &str, transition_id: &str) -> Result<(), PortError> {
        observe("close", self.inner.transition(key, transition_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{with_prometheus, MockStore};

    #[tokio::test]
    async fn delegates_to_inner_store() {
        let store = InstrumentedStore::new(MockStore::default());
        store.connect().await.unwrap();
        let created = store.create(&MockStore::new_ticket("FOO")).await.unwrap();
        assert_eq!(created.key, "FOO-1");
        assert_eq!(store.inner().calls(), vec!["connect", "create:FOO"]);
    }

    #[tokio::test]
    async fn errors_pass_through_unchanged() {
        let inner = MockStore::default();
        inner.fail_on("search");
        let store = InstrumentedStore::new(inner);
        let query = TicketQuery {
            project: "FOO".into(),
            issue_type: "Alert".into(),
            labels: vec![],
            excluded_statuses: vec![],
        };
        let err = store.search(&query).await.unwrap_err();
        assert!(matches!(err, PortError::Request { action: "search", .. }));
    }

    #[test]
    fn records_latency_and_errors_per_action() {
        let inner = MockStore::default();
        inner.fail_on("search");
        let store = InstrumentedStore::new(inner);
        let query = TicketQuery {
            project: "FOO".into(),
            issue_type: "Alert".into(),
            labels: vec![],
            excluded_statuses: vec![],
        };

        let (_, text) = with_prometheus(async {
            store.connect().await.unwrap();
            store.search(&query).await.unwrap_err();
        });

        assert!(text.contains(r#"jiralert_jira_errors_total{action="search"} 1"#), "{text}");
        assert!(!text.contains(r#"jiralert_jira_errors_total{action="connect"}"#));
        assert!(text.contains(r#"jiralert_jira_request_latency_seconds_count{action="connect"} 1"#));
        assert!(text.contains(r#"jiralert_jira_request_latency_seconds_count{action="search"} 1"#));
    }
}
