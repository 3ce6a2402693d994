//! Configuration, cart and checkout orchestration for Tinta.
//!
//! This crate is the stateful core of the storefront:
//!
//! - [`ConfigurationSession`]: the single in-progress draft, keeping the
//!   displayed price consistent with the latest input via a coalescing
//!   recompute scheduler (at most one pricing exchange in flight, edits
//!   arriving mid-flight are never lost)
//! - [`CartStore`]: persistence-backed cart mutation, serialized through
//!   one internal queue
//! - [`CheckoutSession`]: order submission state machine with readiness
//!   validation and failure recovery
//!
//! [`ConfigurationSession`]: session::ConfigurationSession
//! [`CartStore`]: cart_store::CartStore
//! [`CheckoutSession`]: checkout::CheckoutSession

pub mod cart_store;
pub mod checkout;
pub mod error;
pub mod session;

pub use cart_store::CartStore;
pub use checkout::{
    CheckoutForm, CheckoutSession, CheckoutView, LineView, SubmitOutcome, SubmitState,
};
pub use error::SessionError;
pub use session::{ConfigurationSession, DraftSummary, PriceState, RecomputeOutcome};
