//! Process lifecycle: reaching the ticket system and stopping on signals.

use std::future::Future;
use std::io;
use std::time::Duration;

use tracing::{error, info, warn};

use jiralert_app::dispatcher::RequestDispatcher;
use jiralert_ports::outbound::{ContentRenderer, TicketStore};

/// Retries `connect` every `delay` until the ticket system answers and
/// returns how many attempts it took. Webhooks get 503 in the meantime.
pub async fn connect_until_ready<S, R>(
    dispatcher: &RequestDispatcher<S, R>,
    delay: Duration,
) -> u32
where
    S: TicketStore + 'static,
    R: ContentRenderer + 'static,
{
    let mut attempt = 1;
    loop {
        match dispatcher.connect().await {
            Ok(()) => return attempt,
            Err(e) => {
                warn!(
                    attempt,
                    error = %e,
                    retry_in = ?delay,
                    "failed to connect to ticket system"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Resolves on ctrl-c or, on unix, SIGTERM, naming the signal. The SIGTERM
/// handler is installed before this returns.
pub fn shutdown_signal() -> io::Result<impl Future<Output = &'static str>> {
    #[cfg(unix)]
    let mut terminate =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    Ok(async move {
        #[cfg(unix)]
        let terminated = terminate.recv();
        #[cfg(not(unix))]
        let terminated = std::future::pending::<Option<()>>();

        let name = tokio::select! {
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    error!(error = %e, "failed to listen for ctrl-c");
                    std::future::pending::<()>().await;
                }
                "SIGINT"
            }
            _ = terminated => "SIGTERM",
        };
        info!(signal = name, "shutting down");
        name
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use jiralert_adapters::render::HandlebarsRenderer;
    use jiralert_adapters::tracker::InMemoryTicketStore;
    use jiralert_app::dispatcher::DispatchMode;
    use jiralert_app::history::HistoryLog;
    use jiralert_app::reconcile_service::{ReconcileConfig, ReconcileService};
    use jiralert_core::ticket::{Ticket, Transition};
    use jiralert_ports::error::PortError;
    use jiralert_ports::types::{NewTicket, TicketQuery, TicketUpdate};

    /// Refuses the first `outages` connects.
    struct FlakyStore {
        outages: AtomicU32,
        inner: InMemoryTicketStore,
    }

    #[async_trait]
    impl TicketStore for FlakyStore {
        async fn connect(&self) -> Result<(), PortError> {
            let left = self.outages.load(Ordering::SeqCst);
            if left > 0 {
                self.outages.store(left - 1, Ordering::SeqCst);
                return Err(PortError::Connection("connection refused".into()));
            }
            self.inner.connect().await
        }

        async fn search(&self, query: &TicketQuery) -> Result<Vec<Ticket>, PortError> {
            self.inner.search(query).await
        }

        async fn create(&self, ticket: &NewTicket) -> Result<Ticket, PortError> {
            self.inner.create(ticket).await
        }

        async fn update(&self, key: &str, update: &TicketUpdate) -> Result<(), PortError> {
            self.inner.update(key, update).await
        }

        async fn transitions(&self, key: &str) -> Result<Vec<Transition>, PortError> {
            self.inner.transitions(key).await
        }

        async fn transition(&self, key: &str, transition_id: &str) -> Result<(), PortError> {
            self.inner.transition(key, transition_id).await
        }
    }

    fn dispatcher(outages: u32) -> RequestDispatcher<FlakyStore, HandlebarsRenderer> {
        let store = FlakyStore {
            outages: AtomicU32::new(outages),
            inner: InMemoryTicketStore::new("https://jira.example.com"),
        };
        let engine = ReconcileService::new(
            store,
            HandlebarsRenderer::new().unwrap(),
            ReconcileConfig::default(),
        );
        RequestDispatcher::new(engine, HistoryLog::new(5), DispatchMode::Sync)
    }

    #[tokio::test]
    async fn connect_retries_until_ticket_system_is_back() {
        let d = dispatcher(3);

        let attempts = connect_until_ready(&d, Duration::from_millis(5)).await;

        assert_eq!(attempts, 4);
        assert!(d.engine().is_ready());
    }

    #[tokio::test]
    async fn connect_succeeds_first_time_when_reachable() {
        let d = dispatcher(0);
        assert_eq!(connect_until_ready(&d, Duration::from_secs(60)).await, 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn sigterm_triggers_shutdown() {
        let signal = shutdown_signal().unwrap();

        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let name = tokio::time::timeout(Duration::from_secs(5), signal)
            .await
            .unwrap();
        assert_eq!(name, "SIGTERM");
    }
}
