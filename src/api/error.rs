use thiserror::Error;

/// Failures surfaced by the API client. Callers in the view layer treat every
/// variant the same way (log and leave state alone), but keeping them apart
/// makes the log useful.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid header {0:?} in client configuration")]
    InvalidHeader(String),
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {url} returned HTTP {status}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },
    #[error("could not decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status code when the server answered, `None` for transport and
    /// decoding problems.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
