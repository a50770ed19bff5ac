pub mod config;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod routes;
pub mod telemetry;

pub use config::Args;
pub use routes::{create_router, ServerState};
