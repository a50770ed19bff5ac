use jiralert_core::error::DomainError;
use jiralert_ports::error::{PortError, RenderError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] DomainError),
    #[error("Not ready yet")]
    NotReady,
    #[error("ticket system error: {0}")]
    TicketSystem(#[from] PortError),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    #[error("dispatch queue is closed")]
    QueueClosed,
}

impl AppError {
    /// HTTP status reported to Alertmanager. 5xx answers make it re-deliver.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Render(_) => 500,
            Self::NotReady | Self::TicketSystem(_) | Self::QueueClosed => 503,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.status_code() == 503
    }
}
