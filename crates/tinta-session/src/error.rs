//! Session error types.

use thiserror::Error;
use tinta_client::ClientError;
use tinta_commerce::CommerceError;
use tinta_store::StoreError;

/// Errors surfaced by the orchestration layer.
///
/// The three client-facing variants carry the same inner error type but
/// stay distinct: an upload failure rolls the draft back, a pricing
/// failure leaves the last-good price marked stale, and a submission
/// failure preserves cart and form for a retry.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Bad user input, surfaced immediately, never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upload exchange failed (or the file was rejected client-side).
    #[error("Upload failed: {0}")]
    Upload(#[source] ClientError),

    /// Pricing exchange failed after retries.
    #[error("Price calculation failed: {0}")]
    Pricing(#[source] ClientError),

    /// Order submission failed after retries.
    #[error("Order submission failed: {0}")]
    Submission(#[source] ClientError),

    /// Operation called before its preconditions hold.
    #[error("Not ready: {0}")]
    NotReady(String),

    /// Domain-level failure (missing item, invalid transition).
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// Persistence failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}
