use thiserror::Error;

/// Errors from gateway operations.
///
/// The UI collapses all of these into a single "request failed" notice; the
/// detail exists for the log.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base address cannot be used.
    #[error("invalid API base address '{base}': {reason}")]
    InvalidBase { base: String, reason: String },

    /// Transport-level failure (DNS, refused connection, reset, ...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("{method} {url} failed: {status} {reason} {body}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        reason: String,
        body: String,
    },

    /// The body of a successful response was not the expected JSON.
    #[error("failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// The live channel could not be opened.
    #[error("failed to open live channel {url}: {reason}")]
    Connect { url: String, reason: String },
}

/// Result type for gateway operations.
pub type ApiResult<T> = Result<T, ApiError>;
