//! Process-local ticket tracker, for local runs and HTTP-level tests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use jiralert_core::ticket::{Ticket, Transition};
use jiralert_ports::error::PortError;
use jiralert_ports::outbound::TicketStore;
use jiralert_ports::types::{NewTicket, TicketQuery, TicketUpdate};

const OPEN: &str = "Open";
const CLOSED: &str = "Closed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryTicket {
    pub project: String,
    pub issue_type: String,
    pub status: String,
    pub ticket: Ticket,
}

#[derive(Debug)]
pub struct InMemoryTicketStore {
    base_url: String,
    transitions: Vec<Transition>,
    tickets: Mutex<Vec<MemoryTicket>>,
}

impl InMemoryTicketStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transitions: vec![
                Transition {
                    id: "21".into(),
                    name: "Resolve Issue".into(),
                },
                Transition {
                    id: "31".into(),
                    name: "Close Issue".into(),
                },
            ],
            tickets: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the workflow transitions offered on every ticket.
    pub fn with_transitions(mut self, transitions: Vec<Transition>) -> Self {
        self.transitions = transitions;
        self
    }

    pub fn permalink(&self, key: &str) -> String {
        format!("{}/browse/{key}", self.base_url)
    }

    pub fn tickets(&self) -> Vec<MemoryTicket> {
        self.lock().clone()
    }

    pub fn get(&self, key: &str) -> Option<MemoryTicket> {
        self.lock().iter().find(|t| t.ticket.key == key).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<MemoryTicket>> {
        self.tickets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn find<'a>(tickets: &'a mut [MemoryTicket], key: &str) -> Result<&'a mut MemoryTicket, PortError> {
    tickets
        .iter_mut()
        .find(|t| t.ticket.key == key)
        .ok_or_else(|| PortError::NotFound(key.to_string()))
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn connect(&self) -> Result<(), PortError> {
        Ok(())
    }

    async fn search(&self, query: &TicketQuery) -> Result<Vec<Ticket>, PortError> {
        Ok(self
            .lock()
            .iter()
            .filter(|t| t.project == query.project && t.issue_type == query.issue_type)
            .filter(|t| query.labels.iter().all(|l| t.ticket.has_label(l)))
            .filter(|t| {
                !query
                    .excluded_statuses
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(&t.status))
            })
            .map(|t| t.ticket.clone())
            .collect())
    }

    async fn create(&self, ticket: &NewTicket) -> Result<Ticket, PortError> {
        let mut tickets = self.lock();
        let seq = tickets
            .iter()
            .filter(|t| t.project == ticket.project)
            .count()
            + 1;
        let key = format!("{}-{seq}", ticket.project);
        let created = Ticket {
            permalink: self.permalink(&key),
            key,
            summary: ticket.summary.clone(),
            description: Some(ticket.description.clone()),
            labels: ticket.labels.clone(),
        };
        debug!(key = %created.key, "created in-memory ticket");
        tickets.push(MemoryTicket {
            project: ticket.project.clone(),
            issue_type: ticket.issue_type.clone(),
            status: OPEN.into(),
            ticket: created.clone(),
        });
        Ok(created)
    }

    async fn update(&self, key: &str, update: &TicketUpdate) -> Result<(), PortError> {
        let mut tickets = self.lock();
        let stored = find(&mut tickets, key)?;
        stored.ticket.summary = update.summary.clone();
        stored.ticket.description = Some(update.description.clone());
        stored.ticket.labels = update.labels.clone();
        Ok(())
    }

    async fn transitions(&self, key: &str) -> Result<Vec<Transition>, PortError> {
        let mut tickets = self.lock();
        find(&mut tickets, key)?;
        Ok(self.transitions.clone())
    }

    async fn transition(&self, key: &str, transition_id: &str) -> Result<(), PortError> {
        if !self.transitions.iter().any(|t| t.id == transition_id) {
            return Err(PortError::Request {
                action: "close",
                message: format!("unknown transition {transition_id}"),
            });
        }
        let mut tickets = self.lock();
        find(&mut tickets, key)?.status = CLOSED.into();
        Ok(())
    }
}
