//! Route table for the webhook receiver.

use std::sync::Arc;

use axum::routing::{get, post, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;

use jiralert_ports::inbound::IssueFiler;

use crate::handlers::{health, history, metrics, post_issues, post_issues_with_project};

pub struct ServerState {
    pub filer: Arc<dyn IssueFiler>,
    /// `None` leaves `/metrics` answering 404.
    pub prometheus: Option<PrometheusHandle>,
}

pub fn create_router(state: Arc<ServerState>) -> Router {
    let issues = Router::new()
        .route("/issues", post(post_issues))
        .route(
            "/issues/{project}/{issue_type}",
            post(post_issues_with_project),
        );

    Router::new()
        .merge(issues.clone())
        .nest("/api", issues.route("/history", get(history)))
        .route("/-/health", get(health))
        .route("/-/healthy", get(health))
        .route("/-/ready", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
