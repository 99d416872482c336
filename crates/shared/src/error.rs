use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the upload endpoint alongside a non-success status,
/// e.g. `{"error": "No files part in the request"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("response body must be a JSON object or array, found {found}")]
    UnexpectedShape { found: &'static str },
    #[error("response body does not match the upload contract: {0}")]
    Contract(#[source] serde_json::Error),
}
