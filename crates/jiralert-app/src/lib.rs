pub mod dispatcher;
pub mod error;
pub mod history;
pub mod instrumented;
pub mod readiness;
pub mod reconcile_service;
pub mod worker_pool;

#[cfg(test)]
mod testing;
