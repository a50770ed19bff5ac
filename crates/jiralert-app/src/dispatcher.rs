use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, warn};

use jiralert_core::alert::AlertGroupPayload;
use jiralert_core::history::HistoryEntry;
use jiralert_core::outcome::Reply;
use jiralert_ports::inbound::IssueFiler;
use jiralert_ports::outbound::{ContentRenderer, TicketStore};

use crate::error::AppError;
use crate::history::HistoryLog;
use crate::reconcile_service::ReconcileService;
use crate::worker_pool::{ReconcileJob, WorkerPool};

pub const REQUEST_LATENCY: &str = "jiralert_request_latency_seconds";
pub const RECONCILE_ERRORS: &str = "jiralert_errors_total";

const GENERIC_ENDPOINT: &str = "/issues";
const QUALIFIED_ENDPOINT: &str = "/issues/<project>/<issue_type>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Reconcile inside the request and return the report.
    Sync,
    /// Queue for a fixed pool of workers and answer immediately.
    Async { workers: usize },
}

/// Runs one reconciliation and turns its result into a reply.
pub(crate) async fn file_issue<S, R>(
    engine: &ReconcileService<S, R>,
    project: &str,
    issue_type: &str,
    payload: &AlertGroupPayload,
) -> Reply
where
    S: TicketStore,
    R: ContentRenderer,
{
    match engine.reconcile(project, issue_type, payload).await {
        Ok(report) => Reply::ok(report),
        Err(e) => {
            metrics::counter!(RECONCILE_ERRORS).increment(1);
            error!(project, issue_type, error = %e, "failed to reconcile alert group");
            Reply::error(e.to_string(), e.status_code())
        }
    }
}

pub struct RequestDispatcher<S, R>
where
    S: TicketStore + 'static,
    R: ContentRenderer + 'static,
{
    engine: Arc<ReconcileService<S, R>>,
    history: Arc<HistoryLog>,
    pool: Option<WorkerPool>,
}

impl<S, R> RequestDispatcher<S, R>
where
    S: TicketStore + 'static,
    R: ContentRenderer + 'static,
{
    /// Async mode spawns its workers, so it needs a running tokio runtime.
    pub fn new(engine: ReconcileService<S, R>, history: HistoryLog, mode: DispatchMode) -> Self {
        let engine = Arc::new(engine);
        let history = Arc::new(history);
        let pool = match mode {
            DispatchMode::Sync => None,
            DispatchMode::Async { workers } => {
                Some(WorkerPool::start(workers, engine.clone(), history.clone()))
            }
        };
        Self {
            engine,
            history,
            pool,
        }
    }

    pub fn mode(&self) -> DispatchMode {
        match &self.pool {
            Some(pool) => DispatchMode::Async {
                workers: pool.size(),
            },
            None => DispatchMode::Sync,
        }
    }

    pub fn engine(&self) -> &ReconcileService<S, R> {
        &self.engine
    }

    /// Reaches the ticket system; requests are refused until this succeeds.
    pub async fn connect(&self) -> Result<(), AppError> {
        self.engine.connect().await
    }

    /// Drains queued work, then closes the gate.
    pub async fn shutdown(&self) {
        if let Some(pool) = &self.pool {
            pool.shutdown().await;
        }
        self.engine.disconnect();
    }

    async fn file(&self, project: &str, issue_type: &str, payload: AlertGroupPayload) -> Reply {
        let reply = match self.engine.validate(project, issue_type, &payload) {
            Err(e) => {
                warn!(project, issue_type, error = %e, "request rejected");
                Reply::error(e.to_string(), e.status_code())
            }
            Ok(()) => match &self.pool {
                Some(pool) => {
                    let job = ReconcileJob {
                        project: project.to_string(),
                        issue_type: issue_type.to_string(),
                        payload,
                    };
                    // The worker records the real outcome once it is known.
                    match pool.submit(job) {
                        Ok(()) => return Reply::accepted(),
                        Err(e) => {
                            error!(project, issue_type, error = %e, "failed to queue request");
                            return Reply::error(e.to_string(), e.status_code());
                        }
                    }
                }
                None => file_issue(&self.engine, project, issue_type, &payload).await,
            },
        };

        self.record(
            Some(project.to_string()),
            Some(issue_type.to_string()),
            payload,
            reply.clone(),
        );
        reply
    }

    fn record(
        &self,
        project: Option<String>,
        issue_type: Option<String>,
        payload: AlertGroupPayload,
        reply: Reply,
    ) {
        self.history.record(HistoryEntry::new(
            project,
            issue_type,
            payload,
            reply,
            Utc::now(),
        ));
    }
}

fn observe_request(endpoint: &'static str, started: Instant) {
    metrics::histogram!(REQUEST_LATENCY, "endpoint" => endpoint)
        .record(started.elapsed().as_secs_f64());
}

#[async_trait]
impl<S, R> IssueFiler for RequestDispatcher<S, R>
where
    S: TicketStore + 'static,
    R: ContentRenderer + 'static,
{
    async fn post_issues(&self, payload: AlertGroupPayload) -> Reply {
        let started = Instant::now();
        let routing = payload
            .routing()
            .map(|(project, issue_type)| (project.to_string(), issue_type.to_string()));

        let reply = match routing {
            Ok((project, issue_type)) => self.file(&project, &issue_type, payload).await,
            Err(e) => {
                error!(error = %e, "/issues, required commonLabels not found");
                let reply = Reply::error(e.to_string(), 400);
                self.record(None, None, payload, reply.clone());
                reply
            }
        };

        observe_request(GENERIC_ENDPOINT, started);
        reply
    }

    async fn post_issues_with_project(
        &self,
        project: &str,
        issue_type: &str,
        payload: AlertGroupPayload,
    ) -> Reply {
        let started = Instant::now();
        let reply = self.file(project, issue_type, payload).await;
        observe_request(QUALIFIED_ENDPOINT, started);
        reply
    }

    fn is_ready(&self) -> bool {
        self.engine.is_ready()
    }

    fn history(&self) -> Vec<HistoryEntry> {
        self.history.entries()
    }
}
