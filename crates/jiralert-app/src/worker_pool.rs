use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use jiralert_core::alert::AlertGroupPayload;
use jiralert_core::history::HistoryEntry;
use jiralert_ports::outbound::{ContentRenderer, TicketStore};

use crate::dispatcher::file_issue;
use crate::error::AppError;
use crate::history::HistoryLog;
use crate::reconcile_service::ReconcileService;

pub const DEFAULT_WORKERS: usize = 5;

#[derive(Debug, Clone)]
pub struct ReconcileJob {
    pub project: String,
    pub issue_type: String,
    pub payload: AlertGroupPayload,
}

type JobQueue = Arc<tokio::sync::Mutex<mpsc::UnboundedReceiver<ReconcileJob>>>;

/// Fixed set of tasks draining a FIFO queue of reconciliations. Submissions
/// beyond the pool size wait in the queue.
pub struct WorkerPool {
    size: usize,
    sender: Mutex<Option<mpsc::UnboundedSender<ReconcileJob>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Spawns the workers; must be called from within a tokio runtime.
    pub fn start<S, R>(
        size: usize,
        engine: Arc<ReconcileService<S, R>>,
        history: Arc<HistoryLog>,
    ) -> Self
    where
        S: TicketStore + 'static,
        R: ContentRenderer + 'static,
    {
        let size = size.max(1);
        let (sender, receiver) = mpsc::unbounded_channel();
        let queue: JobQueue = Arc::new(tokio::sync::Mutex::new(receiver));

        let workers = (0..size)
            .map(|worker| {
                let queue = queue.clone();
                let engine = engine.clone();
                let history = history.clone();
                tokio::spawn(async move { run_worker(worker, queue, engine, history).await })
            })
            .collect();

        Self {
            size,
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn submit(&self, job: ReconcileJob) -> Result<(), AppError> {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        match sender.as_ref() {
            Some(tx) => tx.send(job).map_err(|_| AppError::QueueClosed),
            None => Err(AppError::QueueClosed),
        }
    }

    /// Stops accepting work and waits for queued jobs to finish.
    pub async fn shutdown(&self) {
        drop(
            self.sender
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take(),
        );
        let workers =
            std::mem::take(&mut *self.workers.lock().unwrap_or_else(PoisonError::into_inner));
        for handle in workers {
            if let Err(e) = handle.await {
                warn!(error = %e, "reconcile worker failed");
            }
        }
    }
}

async fn run_worker<S, R>(
    worker: usize,
    queue: JobQueue,
    engine: Arc<ReconcileService<S, R>>,
    history: Arc<HistoryLog>,
) where
    S: TicketStore,
    R: ContentRenderer,
{
    loop {
        let job = queue.lock().await.recv().await;
        let Some(job) = job else {
            break;
        };
        let reply = file_issue(&engine, &job.project, &job.issue_type, &job.payload).await;
        history.record(HistoryEntry::new(
            Some(job.project),
            Some(job.issue_type),
            job.payload,
            reply,
            Utc::now(),
        ));
    }
    debug!(worker, "reconcile worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile_service::ReconcileConfig;
    use crate::testing::{payload, MockRenderer, MockStore};
    use jiralert_core::alert::Status;

    async fn engine() -> Arc<ReconcileService<MockStore, MockRenderer>> {
        let engine = ReconcileService::new(
            MockStore::default(),
            MockRenderer::default(),
            ReconcileConfig::default(),
        );
        engine.connect().await.unwrap();
        Arc::new(engine)
    }

    fn job(group_key: &str) -> ReconcileJob {
        ReconcileJob {
            project: "FOO".into(),
            issue_type: "Alert".into(),
            payload: payload(group_key, Status::Firing),
        }
    }

    #[tokio::test]
    async fn queued_jobs_drain_on_shutdown() {
        let engine = engine().await;
        let history = Arc::new(HistoryLog::new(10));
        let pool = WorkerPool::start(2, engine.clone(), history.clone());

        for key in ["G1", "G2", "G3", "G4", "G5"] {
            pool.submit(job(key)).unwrap();
        }
        pool.shutdown().await;

        assert_eq!(history.len(), 5);
        assert!(history.entries().iter().all(|e| e.response.code == 200));
    }

    #[tokio::test]
    async fn submit_after_shutdown_fails() {
        let pool = WorkerPool::start(1, engine().await, Arc::new(HistoryLog::default()));
        pool.shutdown().await;
        assert!(matches!(pool.submit(job("G1")), Err(AppError::QueueClosed)));
    }

    #[tokio::test]
    async fn pool_size_is_at_least_one() {
        let pool = WorkerPool::start(0, engine().await, Arc::new(HistoryLog::default()));
        assert_eq!(pool.size(), 1);
        pool.shutdown().await;
    }
}
