//! Checkout: readiness validation and order submission.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use tinta_client::OrderClient;
use tinta_commerce::contact::{CustomerContact, DeliveryMethod};
use tinta_commerce::error::CommerceError;
use tinta_commerce::ids::{Folio, ItemId};
use tinta_commerce::money::{Currency, Money};

use crate::cart_store::CartStore;
use crate::error::SessionError;

/// Submission state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmitState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// An order exchange is in flight; further submits are no-ops.
    Submitting,
    /// Terminal: order accepted, cart cleared.
    Succeeded(Folio),
    /// Order rejected or unreachable; cart and form preserved for retry.
    Failed(String),
}

/// What `submit` did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The order went through; the folio is the confirmation identifier.
    Submitted(Folio),
    /// Another submission was already in flight; nothing was sent.
    AlreadyInFlight,
}

/// The checkout form: contact, delivery, terms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutForm {
    pub contact: CustomerContact,
    pub delivery: Option<DeliveryMethod>,
    pub terms_accepted: bool,
}

impl CheckoutForm {
    /// All required fields present and well-formed.
    pub fn is_complete(&self) -> bool {
        self.contact.is_complete()
            && self
                .delivery
                .as_ref()
                .map(|d| d.is_complete())
                .unwrap_or(false)
            && self.terms_accepted
    }
}

/// One line of the checkout display model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineView {
    pub id: ItemId,
    pub file_name: String,
    pub quantity: u32,
    pub page_count: u32,
    pub options_label: String,
    pub pages_label: String,
    pub total: Money,
}

/// Projection of the cart for the checkout view.
///
/// An empty cart renders distinctly from a populated one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutView {
    pub lines: Vec<LineView>,
    pub subtotal: Money,
    pub total: Money,
    pub is_empty: bool,
}

/// Collects customer data and drives order submission.
pub struct CheckoutSession {
    cart: Arc<CartStore>,
    orders: OrderClient,
    state: Mutex<SubmitState>,
    form: Mutex<CheckoutForm>,
}

impl CheckoutSession {
    pub fn new(cart: Arc<CartStore>, orders: OrderClient) -> Self {
        Self {
            cart,
            orders,
            state: Mutex::new(SubmitState::Idle),
            form: Mutex::new(CheckoutForm::default()),
        }
    }

    pub async fn set_contact(&self, contact: CustomerContact) {
        self.form.lock().await.contact = contact;
    }

    pub async fn set_delivery(&self, delivery: DeliveryMethod) {
        self.form.lock().await.delivery = Some(delivery);
    }

    pub async fn set_terms_accepted(&self, accepted: bool) {
        self.form.lock().await.terms_accepted = accepted;
    }

    pub async fn form(&self) -> CheckoutForm {
        self.form.lock().await.clone()
    }

    pub async fn state(&self) -> SubmitState {
        self.state.lock().await.clone()
    }

    /// Project the cart into the checkout display model.
    pub async fn render(&self) -> Result<CheckoutView, SessionError> {
        let items = self.cart.items().await;
        let subtotal = Money::try_sum(items.iter().map(|i| &i.total), Currency::MXN)
            .ok_or(CommerceError::Overflow)?;

        let lines = items
            .iter()
            .map(|item| LineView {
                id: item.id.clone(),
                file_name: item
                    .file_name
                    .clone()
                    .unwrap_or_else(|| "Sin archivo".to_string()),
                quantity: item.quantity,
                page_count: item.page_count,
                options_label: format!(
                    "{} • {} • {} • {}",
                    item.color.display_name(),
                    item.paper.display_name(),
                    item.size.display_name(),
                    item.sides.display_name(),
                ),
                pages_label: item.page_range.display_label(item.page_count),
                total: item.total,
            })
            .collect::<Vec<_>>();

        Ok(CheckoutView {
            is_empty: lines.is_empty(),
            lines,
            subtotal,
            total: subtotal,
        })
    }

    /// True iff the cart is non-empty with a positive total and the form
    /// is complete (valid email, 10-digit phone, delivery field, terms).
    pub async fn is_ready_to_submit(&self) -> bool {
        if !self.form.lock().await.is_complete() {
            return false;
        }
        let items = self.cart.items().await;
        if items.is_empty() {
            return false;
        }
        match Money::try_sum(items.iter().map(|i| &i.total), Currency::MXN) {
            Some(total) => total.is_positive(),
            None => false,
        }
    }

    /// Submit the order.
    ///
    /// Fails fast with `NotReady` when the cart or form is incomplete. At
    /// most one submission is in flight; a second call during one is a
    /// no-op. On success the cart is cleared and the folio returned; on
    /// failure the cart and form are preserved so the user may retry.
    pub async fn submit(&self) -> Result<SubmitOutcome, SessionError> {
        let (contact, delivery, items, total) = {
            let mut state = self.state.lock().await;
            if matches!(*state, SubmitState::Submitting) {
                return Ok(SubmitOutcome::AlreadyInFlight);
            }

            let form = self.form.lock().await;
            let items = self.cart.items().await;
            let total = Money::try_sum(items.iter().map(|i| &i.total), Currency::MXN)
                .ok_or(CommerceError::Overflow)?;
            let ready = form.is_complete() && !items.is_empty() && total.is_positive();
            if !ready {
                return Err(SessionError::NotReady(
                    "cart or checkout form incomplete".to_string(),
                ));
            }
            let delivery = form
                .delivery
                .clone()
                .ok_or_else(|| SessionError::NotReady("no delivery method".to_string()))?;

            *state = SubmitState::Submitting;
            (form.contact.clone(), delivery, items, total)
        };

        tracing::info!(items = items.len(), total = %total, "submitting order");
        match self.orders.submit(&contact, &delivery, total, &items).await {
            Ok(receipt) => {
                let folio = Folio::new(receipt.folio);
                *self.state.lock().await = SubmitState::Succeeded(folio.clone());
                self.cart.clear().await?;
                *self.form.lock().await = CheckoutForm::default();
                tracing::info!(folio = %folio, "order accepted");
                Ok(SubmitOutcome::Submitted(folio))
            }
            Err(err) => {
                tracing::warn!(error = %err, "order submission failed");
                *self.state.lock().await = SubmitState::Failed(err.to_string());
                Err(SessionError::Submission(err))
            }
        }
    }
}
