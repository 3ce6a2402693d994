//! Client error types.

use thiserror::Error;

/// Errors from a collaborator exchange.
///
/// Everything except `FileTooLarge` is retryable: the retry loop treats
/// transport failures and application-level rejections uniformly.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Payload rejected client-side before any network attempt.
    #[error("File too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: usize, limit: usize },

    /// Non-2xx transport status.
    #[error("HTTP error: status {0}")]
    Http(u16),

    /// Connection or request failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The collaborator answered with an empty body.
    #[error("Empty response body")]
    EmptyBody,

    /// The body could not be parsed as the expected response.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The collaborator reported an application-level error.
    #[error("Collaborator rejected request: {0}")]
    Rejected(String),
}

impl ClientError {
    /// Whether the retry loop should spend an attempt on this error.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ClientError::FileTooLarge { .. })
    }
}
