use thiserror::Error;

use crate::models::FailureReason;

/// Failure of a single OGP lookup.
///
/// Clone so a recorded outcome can be replayed by stub providers; the
/// underlying reqwest error is flattened into its message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing metadata: {0}")]
    MissingMetadata(String),

    #[error("Timed out waiting for metadata")]
    Timeout,
}

impl FetchError {
    /// The error kind a card records when this failure ends its fetch.
    pub fn reason(&self) -> FailureReason {
        match self {
            FetchError::Network(_) => FailureReason::Network,
            FetchError::InvalidResponse(_) => FailureReason::InvalidResponse,
            FetchError::MissingMetadata(_) => FailureReason::MissingMetadata,
            FetchError::Timeout => FailureReason::Timeout,
        }
    }
}

/// Map reqwest errors to FetchError, splitting timeouts and status/decode
/// failures out of the generic transport bucket.
impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return FetchError::Timeout;
        }
        if let Some(status) = e.status() {
            return FetchError::InvalidResponse(format!("status {status}"));
        }
        if e.is_decode() {
            return FetchError::InvalidResponse(e.to_string());
        }
        FetchError::Network(e.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("Invalid URL '{url}': {reason}")]
    Invalid { url: String, reason: String },

    #[error("Unsupported scheme '{0}': only http/https links get previews")]
    UnsupportedScheme(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type AppResult<T> = Result<T, AppError>;
