//! Hand-written adapters shared by the unit tests in this crate.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Mutex;

use async_trait::async_trait;

use jiralert_core::alert::{AlertGroupPayload, Status};
use jiralert_core::ticket::{Ticket, Transition};
use jiralert_ports::error::{PortError, RenderError};
use jiralert_ports::outbound::{ContentRenderer, TicketStore};
use jiralert_ports::types::{NewTicket, TicketQuery, TicketUpdate};

#[derive(Debug, Clone)]
pub struct StoredTicket {
    pub project: String,
    pub issue_type: String,
    pub status: String,
    pub ticket: Ticket,
    pub transitions: Vec<Transition>,
}

#[derive(Default)]
pub struct MockStore {
    tickets: Mutex<Vec<StoredTicket>>,
    calls: Mutex<Vec<String>>,
    failing: Mutex<Option<&'static str>>,
}

pub fn permalink(key: &str) -> String {
    format!("https://jira.example.com/browse/{key}")
}

fn default_transitions() -> Vec<Transition> {
    vec![
        Transition {
            id: "11".into(),
            name: "Start Progress".into(),
        },
        Transition {
            id: "21".into(),
            name: "Close Issue".into(),
        },
    ]
}

impl MockStore {
    pub fn new_ticket(project: &str) -> NewTicket {
        NewTicket {
            project: project.into(),
            issue_type: "Alert".into(),
            summary: "summary".into(),
            description: "description".into(),
            labels: vec!["alert".into()],
        }
    }

    pub fn with_ticket(self, key: &str, labels: &[&str], description: Option<&str>) -> Self {
        self.tickets.lock().unwrap().push(StoredTicket {
            project: "FOO".into(),
            issue_type: "Alert".into(),
            status: "Open".into(),
            ticket: Ticket {
                key: key.into(),
                permalink: permalink(key),
                summary: "old summary".into(),
                description: description.map(String::from),
                labels: labels.iter().map(|l| l.to_string()).collect(),
            },
            transitions: default_transitions(),
        });
        self
    }

    pub fn with_transitions(self, key: &str, transitions: Vec<Transition>) -> Self {
        for stored in self.tickets.lock().unwrap().iter_mut() {
            if stored.ticket.key == key {
                stored.transitions = transitions.clone();
            }
        }
        self
    }

    pub fn with_status(self, key: &str, status: &str) -> Self {
        for stored in self.tickets.lock().unwrap().iter_mut() {
            if stored.ticket.key == key {
                stored.status = status.into();
            }
        }
        self
    }

    pub fn fail_on(&self, action: &'static str) {
        *self.failing.lock().unwrap() = Some(action);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn tickets(&self) -> Vec<StoredTicket> {
        self.tickets.lock().unwrap().clone()
    }

    pub fn ticket(&self, key: &str) -> Option<StoredTicket> {
        self.tickets().into_iter().find(|t| t.ticket.key == key)
    }

    fn call(&self, action: &'static str, record: String) -> Result<(), PortError> {
        self.calls.lock().unwrap().push(record);
        if *self.failing.lock().unwrap() == Some(action) {
            return Err(PortError::Request {
                action,
                message: "HTTP 500".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TicketStore for MockStore {
    async fn connect(&self) -> Result<(), PortError> {
        self.call("connect", "connect".into())
    }

    async fn search(&self, query: &TicketQuery) -> Result<Vec<Ticket>, PortError> {
        self.call("search", "search".into())?;
        let tickets = self.tickets.lock().unwrap();
        Ok(tickets
            .iter()
            .filter(|s| s.project == query.project && s.issue_type == query.issue_type)
            .filter(|s| query.labels.iter().all(|l| s.ticket.has_label(l)))
            .filter(|s| {
                !query
                    .excluded_statuses
                    .iter()
                    .any(|x| x.eq_ignore_ascii_case(&s.status))
            })
            .map(|s| s.ticket.clone())
            .collect())
    }

    async fn create(&self, ticket: &NewTicket) -> Result<Ticket, PortError> {
        self.call("create", format!("create:{}", ticket.project))?;
        let mut tickets = self.tickets.lock().unwrap();
        let key = format!("{}-{}", ticket.project, tickets.len() + 1);
        let created = Ticket {
            key: key.clone(),
            permalink: permalink(&key),
            summary: ticket.summary.clone(),
            description: Some(ticket.description.clone()),
            labels: ticket.labels.clone(),
        };
        tickets.push(StoredTicket {
            project: ticket.project.clone(),
            issue_type: ticket.issue_type.clone(),
            status: "Open".into(),
            ticket: created.clone(),
            transitions: default_transitions(),
        });
        Ok(created)
    }

    async fn update(&self, key: &str, update: &TicketUpdate) -> Result<(), PortError> {
        self.call("update", format!("update:{key}"))?;
        let mut tickets = self.tickets.lock().unwrap();
        let stored = tickets
            .iter_mut()
            .find(|s| s.ticket.key == key)
            .ok_or_else(|| PortError::NotFound(key.to_string()))?;
        stored.ticket.summary = update.summary.clone();
        stored.ticket.description = Some(update.description.clone());
        stored.ticket.labels = update.labels.clone();
        Ok(())
    }

    async fn transitions(&self, key: &str) -> Result<Vec<Transition>, PortError> {
        self.call("transitions", format!("transitions:{key}"))?;
        Ok(self.ticket(key).map(|s| s.transitions).unwrap_or_default())
    }

    async fn transition(&self, key: &str, transition_id: &str) -> Result<(), PortError> {
        self.call("close", format!("transition:{key}:{transition_id}"))?;
        let mut tickets = self.tickets.lock().unwrap();
        let stored = tickets
            .iter_mut()
            .find(|s| s.ticket.key == key)
            .ok_or_else(|| PortError::NotFound(key.to_string()))?;
        stored.status = "Closed".into();
        Ok(())
    }
}

#[derive(Default)]
pub struct MockRenderer {
    pub fail: bool,
}

impl ContentRenderer for MockRenderer {
    fn render_summary(&self, payload: &AlertGroupPayload) -> Result<String, RenderError> {
        if self.fail {
            return Err(RenderError::Render {
                name: "summary".into(),
                message: "missing variable".into(),
            });
        }
        let alertname = payload
            .common_labels
            .get("alertname")
            .cloned()
            .unwrap_or_default();
        Ok(format!("{alertname}: firing"))
    }

    fn render_description(&self, payload: &AlertGroupPayload) -> Result<String, RenderError> {
        Ok(format!(
            "{} alerts for {}",
            payload.alerts.len(),
            payload.group_key
        ))
    }
}

pub fn payload(group_key: &str, status: Status) -> AlertGroupPayload {
    AlertGroupPayload {
        version: "4".into(),
        group_key: group_key.into(),
        status,
        receiver: "jiralert".into(),
        group_labels: BTreeMap::new(),
        common_labels: BTreeMap::from([
            ("alertname".into(), "HighCPU".into()),
            ("project".into(), "FOO".into()),
            ("issue_type".into(), "Alert".into()),
            ("severity".into(), "critical".into()),
        ]),
        common_annotations: BTreeMap::new(),
        external_url: "https://alertmanager.example.com".into(),
        alerts: vec![],
    }
}

/// Runs `fut` on a current-thread runtime with a Prometheus recorder scoped
/// to this thread, returning its output and the rendered exposition text.
pub fn with_prometheus<F: Future>(fut: F) -> (F::Output, String) {
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let output = metrics::with_local_recorder(&recorder, || runtime.block_on(fut));
    (output, handle.render())
}
