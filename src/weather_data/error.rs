use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid weather request: {0}")]
    InvalidRequest(String),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout {
        url: String,
        timeout: Duration,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed for {url} with status {status}: {reason}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        reason: String,
    },

    #[error("Failed to decode archive response from {url}")]
    JsonDecode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Archive response is missing '{0}'")]
    MissingField(String),

    #[error("Archive array '{field}' has {found} values, expected {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        found: usize,
    },

    #[error("Archive returned an unparsable date '{0}'")]
    InvalidDate(String, #[source] chrono::ParseError),

    #[error("Giving up on {url} after {attempts} attempts")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        #[source]
        source: Box<FetchError>,
    },
}

impl FetchError {
    /// Transient failures worth another attempt: timeouts, connection problems,
    /// server errors and rate limiting.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout { .. } => true,
            FetchError::NetworkRequest(_, e) => e.is_connect() || e.is_timeout(),
            FetchError::HttpStatus { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}
