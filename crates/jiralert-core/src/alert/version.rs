use crate::error::DomainError;

/// Alertmanager webhook payload versions this service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    V3,
    V4,
}

impl SchemaVersion {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw {
            "3" => Ok(Self::V3),
            "4" => Ok(Self::V4),
            other => Err(DomainError::UnsupportedVersion(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V3 => "3",
            Self::V4 => "4",
        }
    }
}
