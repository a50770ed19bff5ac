use serde::Serialize;

/// Active tickets for one alert group: everything in the project and issue
/// type carrying all `labels` and not in a terminal status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketQuery {
    pub project: String,
    pub issue_type: String,
    pub labels: Vec<String>,
    pub excluded_statuses: Vec<String>,
}

/// Ticket to file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTicket {
    pub project: String,
    pub issue_type: String,
    pub summary: String,
    pub description: String,
    pub labels: Vec<String>,
}

/// Fields rewritten on an existing ticket. `labels` is the full new label set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketUpdate {
    pub summary: String,
    pub description: String,
    pub labels: Vec<String>,
}
