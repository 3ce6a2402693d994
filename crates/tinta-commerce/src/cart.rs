//! Cart and cart item types.

use crate::config::ProductConfiguration;
use crate::error::CommerceError;
use crate::ids::{FileId, ItemId};
use crate::money::{Currency, Money};
use crate::options::{ColorMode, PageRange, PageSize, PaperStock, Sides};
use serde::{Deserialize, Serialize};

/// A frozen snapshot of a configuration committed to the order.
///
/// Immutable once created except through an explicit edit commit, which
/// replaces the fields but never the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Unique item identifier, stable for the life of the item.
    pub id: ItemId,
    pub file_name: Option<String>,
    pub file_id: Option<FileId>,
    pub quantity: u32,
    pub page_count: u32,
    pub color: ColorMode,
    pub paper: PaperStock,
    pub size: PageSize,
    pub sides: Sides,
    pub page_range: PageRange,
    pub page_price: Money,
    pub total: Money,
}

impl CartItem {
    fn from_draft(id: ItemId, draft: &ProductConfiguration) -> Self {
        Self {
            id,
            file_name: draft.file_name.clone(),
            file_id: draft.file_id.clone(),
            quantity: draft.quantity,
            page_count: draft.page_count,
            color: draft.color,
            paper: draft.paper,
            size: draft.size,
            sides: draft.sides,
            page_range: draft.page_range.clone(),
            page_price: draft.page_price,
            total: draft.total,
        }
    }

    /// Rehydrate a draft from this snapshot for editing.
    ///
    /// The file payload is not recoverable from a snapshot, so the draft
    /// starts with the handle retained but nothing pending upload.
    pub fn to_draft(&self) -> ProductConfiguration {
        ProductConfiguration {
            file_name: self.file_name.clone(),
            file_id: self.file_id.clone(),
            quantity: self.quantity,
            page_count: self.page_count,
            page_count_detected: false,
            page_price: self.page_price,
            color: self.color,
            paper: self.paper,
            size: self.size,
            sides: self.sides,
            page_range: self.page_range.clone(),
            total: self.total,
        }
    }
}

/// What a removal did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Item removed, other items remain.
    Removed,
    /// Item removed and the cart is now empty.
    CartEmptied,
}

/// The ordered collection of committed line items.
///
/// Insertion order is significant only for display. At most one item may
/// be the active edit target at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
    editing: Option<ItemId>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from persisted items.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self {
            items,
            editing: None,
        }
    }

    /// Add a configuration as a new item with a fresh identifier.
    ///
    /// Fails with `NotReady` unless the draft has an uploaded file and a
    /// positive quantity.
    pub fn add(&mut self, draft: &ProductConfiguration) -> Result<ItemId, CommerceError> {
        if !draft.is_ready_for_cart(false) {
            return Err(CommerceError::NotReady(
                "draft has no uploaded file or no copies".to_string(),
            ));
        }
        let id = ItemId::generate();
        self.items.push(CartItem::from_draft(id.clone(), draft));
        Ok(id)
    }

    /// Mark an item as the active edit target and return an editable draft.
    pub fn seed_for_edit(&mut self, id: &ItemId) -> Result<ProductConfiguration, CommerceError> {
        let item = self
            .items
            .iter()
            .find(|i| &i.id == id)
            .ok_or_else(|| CommerceError::ItemNotInCart(id.to_string()))?;
        self.editing = Some(id.clone());
        Ok(item.to_draft())
    }

    /// Replace the active edit target in place, preserving its identifier.
    ///
    /// When the new draft carries no file, the previous handle and name
    /// are inherited. Clears the edit target.
    pub fn commit_edit(
        &mut self,
        id: &ItemId,
        draft: &ProductConfiguration,
    ) -> Result<(), CommerceError> {
        if self.editing.as_ref() != Some(id) {
            return Err(CommerceError::NoActiveEdit(id.to_string()));
        }
        let slot = self
            .items
            .iter_mut()
            .find(|i| &i.id == id)
            .ok_or_else(|| CommerceError::ItemNotInCart(id.to_string()))?;

        let mut replacement = CartItem::from_draft(id.clone(), draft);
        if replacement.file_id.is_none() {
            replacement.file_id = slot.file_id.clone();
            if replacement.file_name.is_none() {
                replacement.file_name = slot.file_name.clone();
            }
        }
        *slot = replacement;
        self.editing = None;
        Ok(())
    }

    /// Remove an item. Removing the active edit target clears it.
    pub fn remove(&mut self, id: &ItemId) -> Result<RemoveOutcome, CommerceError> {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != id);
        if self.items.len() == len_before {
            return Err(CommerceError::ItemNotInCart(id.to_string()));
        }
        if self.editing.as_ref() == Some(id) {
            self.editing = None;
        }
        if self.items.is_empty() {
            Ok(RemoveOutcome::CartEmptied)
        } else {
            Ok(RemoveOutcome::Removed)
        }
    }

    /// Abandon the active edit, if any.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Clear all items and any active edit.
    pub fn clear(&mut self) {
        self.items.clear();
        self.editing = None;
    }

    /// The active edit target, if any.
    pub fn editing(&self) -> Option<&ItemId> {
        self.editing.as_ref()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, id: &ItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of item totals.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        Money::try_sum(self.items.iter().map(|i| &i.total), Currency::MXN)
            .ok_or(CommerceError::Overflow)
    }
}
