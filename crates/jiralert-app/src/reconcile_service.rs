use tracing::{debug, info, warn};

use jiralert_core::alert::AlertGroupPayload;
use jiralert_core::error::DomainError;
use jiralert_core::outcome::IssueReport;
use jiralert_core::ticket::tags::BASE_TAG;
use jiralert_core::ticket::{
    build_tags, compare_keys, initial_description, merge_description, pick_resolve_transition,
    TagSet, Ticket,
};
use jiralert_ports::outbound::{ContentRenderer, TicketStore};
use jiralert_ports::types::{NewTicket, TicketQuery, TicketUpdate};

use crate::error::AppError;
use crate::readiness::Readiness;

#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Transition names that close a ticket, in order of preference.
    pub resolve_transitions: Vec<String>,
    /// Statuses of tickets that no longer count as open.
    pub resolved_statuses: Vec<String>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            resolve_transitions: vec!["resolve issue".into(), "close issue".into()],
            resolved_statuses: vec![
                "resolved".into(),
                "closed".into(),
                "done".into(),
                "complete".into(),
            ],
        }
    }
}

/// Ticket content computed once per delivery and applied to every match.
struct Rendered {
    summary: String,
    description: String,
    tags: TagSet,
}

/// Maps an alert group onto its ticket: update or resolve the open ones,
/// file a new one when none is open and the group is still firing.
pub struct ReconcileService<S, R>
where
    S: TicketStore,
    R: ContentRenderer,
{
    store: S,
    renderer: R,
    config: ReconcileConfig,
    readiness: Readiness,
}

impl<S, R> ReconcileService<S, R>
where
    S: TicketStore,
    R: ContentRenderer,
{
    pub fn new(store: S, renderer: R, config: ReconcileConfig) -> Self {
        Self {
            store,
            renderer,
            config,
            readiness: Readiness::default(),
        }
    }

    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    pub fn is_ready(&self) -> bool {
        self.readiness.is_ready()
    }

    pub async fn connect(&self) -> Result<(), AppError> {
        self.store.connect().await?;
        self.readiness.mark_ready();
        info!("connected to ticket system");
        Ok(())
    }

    pub fn disconnect(&self) {
        self.readiness.mark_not_ready();
    }

    /// Checks that need no remote call.
    pub fn validate(
        &self,
        project: &str,
        issue_type: &str,
        payload: &AlertGroupPayload,
    ) -> Result<(), AppError> {
        payload.schema_version()?;
        if project.is_empty() || issue_type.is_empty() {
            return Err(DomainError::MissingRouting.into());
        }
        if !self.readiness.is_ready() {
            return Err(AppError::NotReady);
        }
        Ok(())
    }

    pub async fn reconcile(
        &self,
        project: &str,
        issue_type: &str,
        payload: &AlertGroupPayload,
    ) -> Result<IssueReport, AppError> {
        self.validate(project, issue_type, payload)?;

        let resolved = payload.is_resolved();
        let fingerprint = payload.fingerprint();
        let mut tags = build_tags(&payload.common_labels);
        tags.insert(fingerprint.label());

        let rendered = Rendered {
            summary: self.renderer.render_summary(payload)?,
            description: self.renderer.render_description(payload)?,
            tags,
        };

        info!(project, issue_type, %fingerprint, resolved, "reconciling alert group");

        let query = TicketQuery {
            project: project.to_string(),
            issue_type: issue_type.to_string(),
            labels: vec![BASE_TAG.to_string(), fingerprint.label()],
            excluded_statuses: self.config.resolved_statuses.clone(),
        };
        let mut tickets = self.store.search(&query).await?;
        tickets.sort_by(|a, b| compare_keys(&a.key, &b.key));

        let mut report = IssueReport {
            found: tickets.iter().map(|t| t.permalink.clone()).collect(),
            ..Default::default()
        };

        for ticket in &tickets {
            debug!(project, issue_type, key = %ticket.key, "matching ticket found");
            if self.update_or_resolve(ticket, resolved, &rendered).await? {
                report.resolved.push(ticket.permalink.clone());
            } else {
                report.updated.push(ticket.permalink.clone());
            }
        }

        if tickets.is_empty() {
            if resolved {
                // Never file a ticket for a group that was resolved before it was filed.
                debug!(project, issue_type, %fingerprint, "resolved group has no ticket, skipping");
            } else {
                let created = self.create(project, issue_type, &rendered).await?;
                info!(project, issue_type, key = %created.key, "new ticket created");
                report.created.push(created.permalink);
            }
        }

        Ok(report)
    }

    /// Returns whether the ticket was transitioned to a resolved state.
    async fn update_or_resolve(
        &self,
        ticket: &Ticket,
        resolved: bool,
        rendered: &Rendered,
    ) -> Result<bool, AppError> {
        let mut closed = false;

        if resolved {
            let available = self.store.transitions(&ticket.key).await?;
            match pick_resolve_transition(&available, &self.config.resolve_transitions) {
                Some(transition) => {
                    self.store.transition(&ticket.key, &transition.id).await?;
                    info!(key = %ticket.key, transition = %transition.name, "ticket resolved");
                    closed = true;
                }
                None => warn!(key = %ticket.key, "unable to find a transition to close ticket"),
            }
        }

        let labels: TagSet = ticket
            .labels
            .iter()
            .cloned()
            .chain(rendered.tags.iter().cloned())
            .collect();
        let update = TicketUpdate {
            summary: rendered.summary.clone(),
            description: merge_description(ticket.description.as_deref(), &rendered.description),
            labels: labels.into_iter().collect(),
        };
        self.store.update(&ticket.key, &update).await?;
        info!(key = %ticket.key, "ticket updated");

        Ok(closed)
    }

    async fn create(
        &self,
        project: &str,
        issue_type: &str,
        rendered: &Rendered,
    ) -> Result<Ticket, AppError> {
        let ticket = NewTicket {
            project: project.to_string(),
            issue_type: issue_type.to_string(),
            summary: rendered.summary.clone(),
            description: initial_description(&rendered.description),
            labels: rendered.tags.iter().cloned().collect(),
        };
        Ok(self.store.create(&ticket).await?)
    }
}
