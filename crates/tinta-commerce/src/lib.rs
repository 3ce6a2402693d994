//! Print-shop domain types and logic for Tinta.
//!
//! This crate provides the pure, rendering-agnostic model for composing a
//! print order:
//!
//! - **Configuration**: the in-progress draft of a single print job
//! - **Cart**: committed line items with stable identity and edit support
//! - **Contact**: customer and delivery data with validation predicates
//! - **Navigation**: the step/view finite-state machine
//!
//! # Example
//!
//! ```rust,ignore
//! use tinta_commerce::prelude::*;
//!
//! let mut draft = ProductConfiguration::default();
//! draft.apply_edit(DraftEdit::Quantity(3));
//! draft.set_file("flyer.pdf", FileId::new("f-123"));
//!
//! let mut cart = Cart::new();
//! let id = cart.add(&draft)?;
//! println!("{} items, {}", cart.len(), cart.subtotal()?.display());
//! ```

pub mod cart;
pub mod config;
pub mod contact;
pub mod error;
pub mod ids;
pub mod money;
pub mod nav;
pub mod options;

pub use cart::{Cart, CartItem};
pub use config::{DraftEdit, ProductConfiguration, QuoteOptions};
pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{Cart, CartItem};
    pub use crate::config::{DraftEdit, ProductConfiguration, QuoteOptions};
    pub use crate::contact::{Branch, CustomerContact, DeliveryMethod};
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::nav::{ConfigStep, Navigator, View};
    pub use crate::options::{ColorMode, PageRange, PageSize, PaperStock, Sides};
}
