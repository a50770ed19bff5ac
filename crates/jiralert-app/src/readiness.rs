use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag flipped once the ticket system has been reached.
#[derive(Debug, Clone, Default)]
pub struct Readiness(Arc<AtomicBool>);

impl Readiness {
    pub fn is_ready(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn mark_ready(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn mark_not_ready(&self) {
        self.0.store(false, Ordering::Release);
    }
}
