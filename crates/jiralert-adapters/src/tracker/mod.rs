pub mod jira;
pub mod memory;

pub use jira::{JiraClient, JiraConfig};
pub use memory::InMemoryTicketStore;
