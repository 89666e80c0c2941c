use thiserror::Error;

/// Reasons a submitted signal is rejected before it reaches the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// A required field is absent from the record
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// The payload could not be interpreted as a signal record
    #[error("{0}")]
    Malformed(String),
}

impl IngestError {
    pub fn malformed(message: impl Into<String>) -> Self {
        IngestError::Malformed(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, IngestError::MissingField(_))
    }
}
