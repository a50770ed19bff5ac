use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown message version {0}")]
    UnsupportedVersion(String),
    #[error("required commonLabels not found: issue_type or project")]
    MissingRouting,
}
