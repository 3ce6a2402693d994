//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in configuration, cart and navigation operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// An edit commit was attempted for an item that is not the active edit target.
    #[error("No active edit for item: {0}")]
    NoActiveEdit(String),

    /// Operation requires state the draft does not have yet.
    #[error("Configuration not ready: {0}")]
    NotReady(String),

    /// Invalid view or step transition.
    #[error("Invalid navigation from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Bad user input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}
