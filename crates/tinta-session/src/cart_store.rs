//! Persistence-backed cart mutation.
//!
//! All mutation is serialized through one internal lock and persisted
//! after every change, so the cart survives a session restart. The cart
//! is the only artifact this layer owns on disk.

use tokio::sync::Mutex;

use tinta_commerce::cart::{Cart, CartItem, RemoveOutcome};
use tinta_commerce::config::ProductConfiguration;
use tinta_commerce::ids::ItemId;
use tinta_commerce::money::Money;
use tinta_store::Store;

use crate::error::SessionError;

const CART_KEY: &str = "cart";

/// The shared, persisted cart.
pub struct CartStore {
    cart: Mutex<Cart>,
    store: Store,
}

impl CartStore {
    /// Open the cart store, reloading any persisted items.
    pub fn open(store: Store) -> Result<Self, SessionError> {
        let items: Vec<CartItem> = store.get(CART_KEY)?.unwrap_or_default();
        Ok(Self {
            cart: Mutex::new(Cart::from_items(items)),
            store,
        })
    }

    fn persist(&self, cart: &Cart) -> Result<(), SessionError> {
        self.store.set(CART_KEY, &cart.items())?;
        Ok(())
    }

    /// Append the draft as a new item.
    pub async fn add(&self, draft: &ProductConfiguration) -> Result<ItemId, SessionError> {
        let mut cart = self.cart.lock().await;
        let id = cart.add(draft)?;
        self.persist(&cart)?;
        tracing::debug!(item = %id, items = cart.len(), "cart item added");
        Ok(id)
    }

    /// Mark an item for editing and return a draft seeded from it.
    pub async fn seed_for_edit(
        &self,
        id: &ItemId,
    ) -> Result<ProductConfiguration, SessionError> {
        let mut cart = self.cart.lock().await;
        Ok(cart.seed_for_edit(id)?)
    }

    /// Replace the active edit target, preserving its identifier.
    pub async fn commit_edit(
        &self,
        id: &ItemId,
        draft: &ProductConfiguration,
    ) -> Result<(), SessionError> {
        let mut cart = self.cart.lock().await;
        cart.commit_edit(id, draft)?;
        self.persist(&cart)?;
        tracing::debug!(item = %id, "cart item updated");
        Ok(())
    }

    /// Abandon the active edit, if any.
    pub async fn cancel_edit(&self) {
        self.cart.lock().await.cancel_edit();
    }

    /// Remove an item. [`RemoveOutcome::CartEmptied`] tells the caller to
    /// navigate away from checkout.
    pub async fn remove(&self, id: &ItemId) -> Result<RemoveOutcome, SessionError> {
        let mut cart = self.cart.lock().await;
        let outcome = cart.remove(id)?;
        self.persist(&cart)?;
        tracing::debug!(item = %id, items = cart.len(), "cart item removed");
        Ok(outcome)
    }

    /// Clear the cart (terminal success path, or abandoning the order).
    pub async fn clear(&self) -> Result<(), SessionError> {
        let mut cart = self.cart.lock().await;
        cart.clear();
        self.persist(&cart)?;
        Ok(())
    }

    /// Snapshot of the items in display order.
    pub async fn items(&self) -> Vec<CartItem> {
        self.cart.lock().await.items().to_vec()
    }

    pub async fn get(&self, id: &ItemId) -> Option<CartItem> {
        self.cart.lock().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.cart.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cart.lock().await.is_empty()
    }

    /// The active edit target, if any.
    pub async fn editing(&self) -> Option<ItemId> {
        self.cart.lock().await.editing().cloned()
    }

    /// Sum of item totals.
    pub async fn subtotal(&self) -> Result<Money, SessionError> {
        Ok(self.cart.lock().await.subtotal()?)
    }
}
