use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("request failed ({action}): {message}")]
    Request {
        action: &'static str,
        message: String,
    },
    #[error("unexpected response ({action}): {message}")]
    InvalidResponse {
        action: &'static str,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid template {name}: {message}")]
    Template { name: String, message: String },
    #[error("failed to render {name}: {message}")]
    Render { name: String, message: String },
}
