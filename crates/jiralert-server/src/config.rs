use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use jiralert_app::dispatcher::DispatchMode;
use jiralert_app::reconcile_service::ReconcileConfig;

/// Files Alertmanager webhook notifications as Jira issues.
#[derive(Debug, Clone, Parser)]
#[command(name = "jiralert", version)]
pub struct Args {
    /// Jira base URL, e.g. https://jira.example.com
    #[arg(env = "JIRALERT_SERVER", value_name = "URL", required_unless_present = "dry_run")]
    pub server: Option<String>,

    #[arg(long, env = "JIRA_USERNAME", hide_env_values = true)]
    pub username: Option<String>,

    #[arg(long, env = "JIRA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Transition names that resolve a ticket, in order of preference.
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = ["resolve issue".to_string(), "close issue".to_string()]
    )]
    pub res_transitions: Vec<String>,

    /// Statuses of tickets that are already resolved.
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = [
            "resolved".to_string(),
            "closed".to_string(),
            "done".to_string(),
            "complete".to_string(),
        ]
    )]
    pub res_status: Vec<String>,

    /// Answer webhooks immediately and reconcile in background workers.
    #[arg(long = "async")]
    pub async_mode: bool,

    #[arg(long, default_value_t = jiralert_app::worker_pool::DEFAULT_WORKERS)]
    pub workers: usize,

    #[arg(long, default_value_t = jiralert_app::history::DEFAULT_HISTORY_CAPACITY)]
    pub history_size: usize,

    #[arg(long, env = "JIRALERT_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Timeout for each Jira API call.
    #[arg(long, default_value = "30s")]
    pub request_timeout: humantime::Duration,

    /// Pause between connection attempts while Jira is unreachable (async mode).
    #[arg(long, default_value = "10s")]
    pub connect_retry: humantime::Duration,

    /// Directory holding summary.hbs and description.hbs.
    #[arg(long, env = "JIRALERT_TEMPLATES")]
    pub templates: Option<PathBuf>,

    /// Keep tickets in memory instead of talking to Jira.
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, env = "JIRALERT_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long)]
    pub log_json: bool,
}

fn normalize(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

impl Args {
    pub fn reconcile_config(&self) -> ReconcileConfig {
        ReconcileConfig {
            resolve_transitions: normalize(&self.res_transitions),
            resolved_statuses: normalize(&self.res_status),
        }
    }

    pub fn dispatch_mode(&self) -> DispatchMode {
        if self.async_mode {
            DispatchMode::Async {
                workers: self.workers,
            }
        } else {
            DispatchMode::Sync
        }
    }

    /// Jira credentials, when both are set.
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some((u.clone(), p.clone())),
            _ => None,
        }
    }
}
