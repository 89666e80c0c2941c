use serde::{Deserialize, Serialize};

/// Acknowledgement for an accepted signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendSignalResponse {
    pub status: String,
}

impl SendSignalResponse {
    pub fn success() -> Self {
        SendSignalResponse {
            status: "success".to_string(),
        }
    }
}

/// Error body returned with every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
        }
    }
}
