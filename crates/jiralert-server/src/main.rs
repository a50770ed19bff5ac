use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use jiralert_adapters::render::HandlebarsRenderer;
use jiralert_adapters::tracker::{InMemoryTicketStore, JiraClient, JiraConfig};
use jiralert_app::dispatcher::{DispatchMode, RequestDispatcher};
use jiralert_app::history::HistoryLog;
use jiralert_app::instrumented::InstrumentedStore;
use jiralert_app::reconcile_service::ReconcileService;
use jiralert_ports::outbound::TicketStore;
use jiralert_server::lifecycle::{connect_until_ready, shutdown_signal};
use jiralert_server::{create_router, telemetry, Args, ServerState};

/// Exit code for a missing Jira login.
const EXIT_NO_CREDENTIALS: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = telemetry::init_tracing(&args.log_level, args.log_json) {
        eprintln!("jiralert: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %format!("{e:#}"), "jiralert stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    if args.dry_run {
        info!("dry run, tickets are kept in memory");
        let store = InMemoryTicketStore::new("http://jiralert.invalid");
        serve(args, store).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some((username, password)) = args.credentials() else {
        error!("JIRA_USERNAME and JIRA_PASSWORD must be set");
        return Ok(ExitCode::from(EXIT_NO_CREDENTIALS));
    };
    let server = args.server.clone().context("missing Jira server URL")?;
    let client = JiraClient::new(JiraConfig {
        base_url: server,
        username,
        password,
        timeout: *args.request_timeout,
    })
    .context("building Jira client")?;

    serve(args, client).await?;
    Ok(ExitCode::SUCCESS)
}

async fn serve<S>(args: Args, store: S) -> anyhow::Result<()>
where
    S: TicketStore + 'static,
{
    let prometheus = telemetry::init_metrics()?;
    let renderer = match &args.templates {
        Some(dir) => HandlebarsRenderer::from_dir(dir),
        None => HandlebarsRenderer::new(),
    }
    .context("loading templates")?;

    let engine = ReconcileService::new(
        InstrumentedStore::new(store),
        renderer,
        args.reconcile_config(),
    );
    let mode = args.dispatch_mode();
    let dispatcher = Arc::new(RequestDispatcher::new(
        engine,
        HistoryLog::new(args.history_size),
        mode,
    ));

    match mode {
        // Webhooks are answered 503 until the background connect succeeds.
        DispatchMode::Async { .. } => {
            let dispatcher = dispatcher.clone();
            let delay = *args.connect_retry;
            tokio::spawn(async move {
                let attempts = connect_until_ready(&dispatcher, delay).await;
                info!(attempts, "connected to ticket system");
            });
        }
        DispatchMode::Sync => dispatcher
            .connect()
            .await
            .context("connecting to ticket system")?,
    }

    let app = create_router(Arc::new(ServerState {
        filer: dispatcher.clone(),
        prometheus: Some(prometheus),
    }));

    let listener = TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("binding {}", args.listen))?;
    info!(listen = %args.listen, ?mode, "jiralert listening");

    axum::serve(listener, app)
        .with_graceful_shutdown({
            let signal = shutdown_signal().context("installing signal handlers")?;
            async move {
                signal.await;
            }
        })
        .await
        .context("serving http")?;

    info!("draining queued work");
    dispatcher.shutdown().await;
    Ok(())
}

