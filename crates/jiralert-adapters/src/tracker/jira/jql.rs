use jiralert_ports::types::TicketQuery;

/// JQL string literal with quotes and backslashes escaped.
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Search for the open tickets of an alert group.
///
/// Clause order matters for Jira's query planner: the cheap `labels = "alert"`
/// filter goes first and the selective fingerprint label last.
pub fn search_jql(query: &TicketQuery) -> String {
    let mut clauses = vec![
        format!("project = {}", quote(&query.project)),
        format!("issuetype = {}", quote(&query.issue_type)),
    ];

    let mut labels = query.labels.iter();
    if let Some(first) = labels.next() {
        clauses.push(format!("labels = {}", quote(first)));
    }
    if !query.excluded_statuses.is_empty() {
        let statuses: Vec<_> = query.excluded_statuses.iter().map(|s| quote(s)).collect();
        clauses.push(format!("status not in ({})", statuses.join(",")));
    }
    clauses.extend(labels.map(|l| format!("labels = {}", quote(l))));

    clauses.join(" and ")
}
