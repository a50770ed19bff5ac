use async_trait::async_trait;

use jiralert_core::alert::AlertGroupPayload;
use jiralert_core::ticket::{Ticket, Transition};

use crate::error::{PortError, RenderError};
use crate::types::{NewTicket, TicketQuery, TicketUpdate};

/// Remote ticket tracker. Every call is a single attempt; retries belong to
/// whoever re-delivers the webhook.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Verifies the tracker is reachable with the configured credentials.
    async fn connect(&self) -> Result<(), PortError>;
    async fn search(&self, query: &TicketQuery) -> Result<Vec<Ticket>, PortError>;
    async fn create(&self, ticket: &NewTicket) -> Result<Ticket, PortError>;
    async fn update(&self, key: &str, update: &TicketUpdate) -> Result<(), PortError>;
    async fn transitions(&self, key: &str) -> Result<Vec<Transition>, PortError>;
    async fn transition(&self, key: &str, transition_id: &str) -> Result<(), PortError>;
}

/// Human-readable ticket text for an alert group.
pub trait ContentRenderer: Send + Sync {
    fn render_summary(&self, payload: &AlertGroupPayload) -> Result<String, RenderError>;
    fn render_description(&self, payload: &AlertGroupPayload) -> Result<String, RenderError>;
}
