//! The request/response boundary to the remote collaborator.

use async_trait::async_trait;

use crate::error::ClientError;

/// A single-endpoint request/response collaborator.
///
/// Implementations must not retry internally; the clients own the retry
/// loop. Test doubles implement this to script outcomes.
#[async_trait]
pub trait Collaborator: Send + Sync {
    /// POST a JSON payload, returning the raw response body.
    async fn post(&self, body: String) -> Result<String, ClientError>;
}

/// HTTP collaborator posting to one configured endpoint.
///
/// The endpoint expects `text/plain;charset=utf-8` bodies (it is a script
/// host, not a JSON API), so the payload is sent as plain text.
pub struct HttpCollaborator {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpCollaborator {
    /// Create a collaborator for the given endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Collaborator for HttpCollaborator {
    async fn post(&self, body: String) -> Result<String, ClientError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Http(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))
    }
}
