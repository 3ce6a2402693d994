//! Retried collaborator clients for Tinta.
//!
//! The storefront talks to exactly one remote endpoint with JSON-bodied
//! POSTs, distinguished by an `action` field. This crate provides:
//!
//! - the wire types for the three exchanges (upload, pricing, order)
//! - a uniform linear-backoff retry policy
//! - `PricingClient`, `OrderClient` and `FileUploadClient` sharing one
//!   retried exchange path
//!
//! Transport failures, non-2xx statuses, empty or unparsable bodies and
//! application-level rejections all travel the same retry path; only
//! after attempts are exhausted does the last error surface.

pub mod clients;
pub mod config;
pub mod error;
pub mod retry;
pub mod transport;
pub mod wire;

pub use clients::{build_clients, FileUploadClient, OrderClient, PricingClient};
pub use config::ClientConfig;
pub use error::ClientError;
pub use retry::{BackoffStrategy, ExchangeTag, RetryPolicy};
pub use transport::{Collaborator, HttpCollaborator};
pub use wire::{ApiRequest, OrderReceipt, PriceQuote, UploadReceipt};
