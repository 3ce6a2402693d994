//! The single in-progress product configuration.
//!
//! `ConfigurationSession` owns the draft and keeps its computed price
//! consistent with the latest field values. The recompute contract: at
//! most one pricing exchange is in flight per session; edits arriving
//! mid-flight set a pending marker, and when the exchange completes
//! exactly one follow-up is issued from the *current* draft state,
//! repeating until no further edits arrived during the last exchange.
//! Every request is tagged with the draft revision it was computed from;
//! results for superseded revisions are discarded, so a stale response
//! can never overwrite a newer edit.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use tinta_client::{ClientError, FileUploadClient, PricingClient};
use tinta_commerce::cart::CartItem;
use tinta_commerce::config::{DraftEdit, ProductConfiguration};
use tinta_commerce::ids::{FileId, ItemId};
use tinta_commerce::money::Money;

use crate::error::SessionError;

/// Freshness of the draft's `page_price`/`total` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PriceState {
    /// No pricing round-trip has completed yet.
    #[default]
    Unpriced,
    /// Values match the current draft.
    Current,
    /// The draft changed since the values were computed.
    Stale,
    /// The last recompute failed; values are the last good ones.
    Failed,
}

/// How a recompute request was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeOutcome {
    /// This call drove the exchange (and any coalesced follow-ups) to
    /// completion.
    Updated,
    /// Another exchange was in flight; the request was folded into its
    /// follow-up pass.
    Coalesced,
}

#[derive(Debug)]
struct DraftState {
    draft: ProductConfiguration,
    price: PriceState,
    /// Bumped on every price-relevant mutation.
    revision: u64,
    /// A pricing exchange is currently in flight.
    in_flight: bool,
    /// An edit arrived during the in-flight exchange.
    pending: bool,
    /// Cart item being edited, if any. The cart owns the authoritative
    /// edit target; this mirror relaxes the file requirement.
    editing: Option<ItemId>,
}

impl Default for DraftState {
    fn default() -> Self {
        Self {
            draft: ProductConfiguration::default(),
            price: PriceState::Unpriced,
            revision: 0,
            in_flight: false,
            pending: false,
            editing: None,
        }
    }
}

/// The in-progress configuration session.
///
/// Cloning shares the same draft; clones are how concurrent UI callbacks
/// reach one session.
#[derive(Clone)]
pub struct ConfigurationSession {
    state: Arc<Mutex<DraftState>>,
    pricing: PricingClient,
    uploads: FileUploadClient,
}

impl ConfigurationSession {
    pub fn new(pricing: PricingClient, uploads: FileUploadClient) -> Self {
        Self {
            state: Arc::new(Mutex::new(DraftState::default())),
            pricing,
            uploads,
        }
    }

    /// Record an edit without driving a recompute.
    ///
    /// Most callers want [`apply`](Self::apply); this exists for seeding
    /// several fields before one recompute pass.
    pub async fn edit(&self, edit: DraftEdit) {
        let mut st = self.state.lock().await;
        st.draft.apply_edit(edit);
        Self::mark_dirty(&mut st);
    }

    /// Apply an edit and bring the price up to date.
    pub async fn apply(&self, edit: DraftEdit) -> Result<RecomputeOutcome, SessionError> {
        self.edit(edit).await;
        self.recompute_price().await
    }

    /// Record a page count detected from the document itself.
    pub async fn apply_detected_page_count(
        &self,
        pages: u32,
    ) -> Result<RecomputeOutcome, SessionError> {
        {
            let mut st = self.state.lock().await;
            st.draft.set_detected_page_count(pages);
            Self::mark_dirty(&mut st);
        }
        self.recompute_price().await
    }

    fn mark_dirty(st: &mut DraftState) {
        st.revision += 1;
        if st.price == PriceState::Current {
            st.price = PriceState::Stale;
        }
        if st.in_flight {
            st.pending = true;
        }
    }

    /// Bring the displayed price up to date with the draft.
    ///
    /// At most one exchange is in flight; a call made during one returns
    /// [`RecomputeOutcome::Coalesced`] immediately and the in-flight
    /// driver issues the follow-up. On failure after retries the price is
    /// marked [`PriceState::Failed`] but the last good values are kept;
    /// any further edit retries.
    pub async fn recompute_price(&self) -> Result<RecomputeOutcome, SessionError> {
        {
            let mut st = self.state.lock().await;
            if st.in_flight {
                st.pending = true;
                return Ok(RecomputeOutcome::Coalesced);
            }
            st.in_flight = true;
            st.pending = false;
        }

        let mut last_error: Option<ClientError> = None;
        loop {
            let (options, revision) = {
                let mut st = self.state.lock().await;
                st.pending = false;
                (st.draft.quote_options(), st.revision)
            };

            tracing::debug!(revision, "requesting price quote");
            let result = self.pricing.quote(&options).await;

            let mut st = self.state.lock().await;
            match result {
                Ok(quote) => {
                    last_error = None;
                    if st.revision == revision {
                        st.draft
                            .apply_quote(quote.page_price_money(), quote.total_money());
                        st.price = PriceState::Current;
                    } else {
                        tracing::debug!(
                            revision,
                            latest = st.revision,
                            "discarding superseded quote"
                        );
                    }
                }
                Err(err) => {
                    tracing::warn!(revision, error = %err, "price quote failed");
                    if st.revision == revision {
                        st.price = PriceState::Failed;
                    }
                    last_error = Some(err);
                }
            }
            if !st.pending {
                st.in_flight = false;
                break;
            }
            // An edit arrived mid-flight: issue exactly one follow-up
            // from the current draft.
        }

        match last_error {
            None => Ok(RecomputeOutcome::Updated),
            Some(err) => Err(SessionError::Pricing(err)),
        }
    }

    /// Upload a document into the draft.
    ///
    /// On failure the draft's file fields are rolled back to "no file";
    /// the caller may retry by calling this again. On success the stored
    /// handle triggers a price recompute.
    pub async fn upload_file(
        &self,
        bytes: &[u8],
        mime_type: &str,
        file_name: &str,
    ) -> Result<RecomputeOutcome, SessionError> {
        {
            let mut st = self.state.lock().await;
            st.draft.set_pending_file(file_name);
        }
        match self.uploads.upload(bytes, mime_type, file_name).await {
            Ok(receipt) => {
                {
                    let mut st = self.state.lock().await;
                    st.draft
                        .set_file(receipt.file_name, FileId::new(receipt.file_id));
                    Self::mark_dirty(&mut st);
                }
                tracing::info!(file = file_name, "upload complete");
                self.recompute_price().await
            }
            Err(err) => {
                let mut st = self.state.lock().await;
                st.draft.clear_file();
                Err(SessionError::Upload(err))
            }
        }
    }

    /// Seed the session from a cart item for editing.
    ///
    /// The file payload is not recoverable from the snapshot; the handle
    /// is retained, and the snapshot's price is trusted until edited.
    pub async fn seed_from_item(&self, item: &CartItem) {
        let mut st = self.state.lock().await;
        st.draft = item.to_draft();
        st.editing = Some(item.id.clone());
        st.revision += 1;
        st.price = PriceState::Current;
    }

    /// Discard the draft and start over.
    pub async fn reset(&self) {
        let mut st = self.state.lock().await;
        st.draft = ProductConfiguration::default();
        st.editing = None;
        st.revision += 1;
        st.price = PriceState::Unpriced;
        st.pending = false;
    }

    /// The cart item being edited, if any.
    pub async fn editing(&self) -> Option<ItemId> {
        self.state.lock().await.editing.clone()
    }

    /// Current freshness of the displayed price.
    pub async fn price_state(&self) -> PriceState {
        self.state.lock().await.price
    }

    /// A copy of the current draft.
    pub async fn snapshot(&self) -> ProductConfiguration {
        self.state.lock().await.draft.clone()
    }

    /// A snapshot fit to become (or replace) a cart item.
    ///
    /// Fails with `NotReady` unless the draft has an uploaded file (or an
    /// edit is in progress, inheriting the original handle) and a
    /// positive quantity.
    pub async fn to_cart_item(&self) -> Result<ProductConfiguration, SessionError> {
        let st = self.state.lock().await;
        if !st.draft.is_ready_for_cart(st.editing.is_some()) {
            return Err(SessionError::NotReady(
                "draft has no uploaded file or no copies".to_string(),
            ));
        }
        Ok(st.draft.clone())
    }

    /// Display projection of the draft.
    pub async fn summary(&self) -> DraftSummary {
        let st = self.state.lock().await;
        DraftSummary {
            file_name: st.draft.file_name.clone(),
            quantity: st.draft.quantity,
            page_count: st.draft.page_count,
            page_count_detected: st.draft.page_count_detected,
            color: st.draft.color.display_name().to_string(),
            paper: st.draft.paper.display_name().to_string(),
            size: st.draft.size.display_name().to_string(),
            sides: st.draft.sides.display_name().to_string(),
            pages_label: st.draft.page_range.display_label(st.draft.page_count),
            page_price: st.draft.page_price,
            subtotal_per_copy: st.draft.subtotal_per_copy(),
            total: st.draft.total,
            price_state: st.price,
            can_add_to_cart: st.draft.is_ready_for_cart(st.editing.is_some()),
        }
    }
}

/// What a rendering surface needs to show the draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftSummary {
    pub file_name: Option<String>,
    pub quantity: u32,
    pub page_count: u32,
    pub page_count_detected: bool,
    pub color: String,
    pub paper: String,
    pub size: String,
    pub sides: String,
    pub pages_label: String,
    pub page_price: Money,
    pub subtotal_per_copy: Money,
    pub total: Money,
    pub price_state: PriceState,
    pub can_add_to_cart: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use tinta_client::{BackoffStrategy, Collaborator, RetryPolicy};

    fn fast_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts).with_backoff(BackoffStrategy::Linear {
            base: Duration::from_millis(1),
        })
    }

    fn quote_body(body: &str) -> String {
        let sent: serde_json::Value = serde_json::from_str(body).unwrap_or_default();
        let cantidad = sent["options"]["cantidad"].as_u64().unwrap_or(0);
        format!(
            r#"{{"status":"success","pagePrice":1.00,"total":{}.00}}"#,
            cantidad
        )
    }

    /// Collaborator that parks every call until the test releases it.
    struct GatedCollaborator {
        gate: tokio::sync::Semaphore,
        arrived: tokio::sync::Notify,
        bodies: StdMutex<Vec<String>>,
    }

    impl GatedCollaborator {
        fn new() -> Self {
            Self {
                gate: tokio::sync::Semaphore::new(0),
                arrived: tokio::sync::Notify::new(),
                bodies: StdMutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.bodies.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Collaborator for GatedCollaborator {
        async fn post(&self, body: String) -> Result<String, ClientError> {
            self.bodies.lock().unwrap().push(body.clone());
            self.arrived.notify_one();
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| ClientError::Transport(e.to_string()))?;
            permit.forget();
            Ok(quote_body(&body))
        }
    }

    /// Collaborator that fails the next N calls, then answers from the body.
    struct FlakyCollaborator {
        fail_remaining: AtomicU32,
        calls: AtomicU32,
    }

    impl FlakyCollaborator {
        fn new(fail_remaining: u32) -> Self {
            Self {
                fail_remaining: AtomicU32::new(fail_remaining),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl Collaborator for FlakyCollaborator {
        async fn post(&self, body: String) -> Result<String, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let remaining = self.fail_remaining.load(Ordering::SeqCst);
            if remaining > 0 {
                self.fail_remaining.store(remaining - 1, Ordering::SeqCst);
                return Err(ClientError::Http(500));
            }
            let sent: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
            if sent["action"] == "uploadFile" {
                return Ok(format!(
                    r#"{{"status":"success","fileId":"f-77","fileName":{}}}"#,
                    sent["fileName"]
                ));
            }
            Ok(quote_body(&body))
        }
    }

    fn session_over(
        collaborator: Arc<dyn Collaborator>,
        attempts: u32,
    ) -> ConfigurationSession {
        ConfigurationSession::new(
            PricingClient::new(collaborator.clone()).with_policy(fast_policy(attempts)),
            FileUploadClient::new(collaborator).with_policy(fast_policy(attempts)),
        )
    }

    #[tokio::test]
    async fn test_single_edit_updates_price() {
        let collaborator = Arc::new(FlakyCollaborator::new(0));
        let session = session_over(collaborator, 1);

        let outcome = session.apply(DraftEdit::Quantity(2)).await.unwrap();
        assert_eq!(outcome, RecomputeOutcome::Updated);

        let summary = session.summary().await;
        assert_eq!(summary.total.amount_cents, 200);
        assert_eq!(summary.subtotal_per_copy.amount_cents, 100);
        assert_eq!(summary.price_state, PriceState::Current);
    }

    #[tokio::test]
    async fn test_edits_during_flight_coalesce_to_latest() {
        let collaborator = Arc::new(GatedCollaborator::new());
        let session = session_over(collaborator.clone(), 1);

        let driver = {
            let session = session.clone();
            tokio::spawn(async move { session.apply(DraftEdit::Quantity(2)).await })
        };
        collaborator.arrived.notified().await;

        // Two edits land while the first quote is parked in flight.
        assert_eq!(
            session.apply(DraftEdit::Quantity(3)).await.unwrap(),
            RecomputeOutcome::Coalesced
        );
        assert_eq!(
            session.apply(DraftEdit::Quantity(7)).await.unwrap(),
            RecomputeOutcome::Coalesced
        );

        collaborator.gate.add_permits(8);
        assert_eq!(driver.await.unwrap().unwrap(), RecomputeOutcome::Updated);

        // One in-flight exchange plus exactly one follow-up.
        assert_eq!(collaborator.calls(), 2);

        let bodies = collaborator.bodies.lock().unwrap();
        let follow_up: serde_json::Value = serde_json::from_str(&bodies[1]).unwrap();
        assert_eq!(follow_up["options"]["cantidad"], 7);
        drop(bodies);

        // The displayed price matches the last edit, not an intermediate.
        let summary = session.summary().await;
        assert_eq!(summary.total.amount_cents, 700);
        assert_eq!(summary.price_state, PriceState::Current);
    }

    #[tokio::test]
    async fn test_superseded_result_never_overwrites_newer_edit() {
        let collaborator = Arc::new(GatedCollaborator::new());
        let session = session_over(collaborator.clone(), 1);

        let driver = {
            let session = session.clone();
            tokio::spawn(async move { session.apply(DraftEdit::Quantity(2)).await })
        };
        collaborator.arrived.notified().await;
        session.apply(DraftEdit::Quantity(9)).await.unwrap();

        // Release only the first (stale) response and wait for the
        // follow-up to go out.
        collaborator.gate.add_permits(1);
        collaborator.arrived.notified().await;

        // The stale quantity=2 result must not be visible.
        let summary = session.summary().await;
        assert_ne!(summary.total.amount_cents, 200);

        collaborator.gate.add_permits(1);
        driver.await.unwrap().unwrap();
        assert_eq!(session.summary().await.total.amount_cents, 900);
    }

    #[tokio::test]
    async fn test_retry_recovers_within_attempt_budget() {
        let collaborator = Arc::new(FlakyCollaborator::new(2));
        let session = session_over(collaborator.clone(), 3);

        let outcome = session.apply(DraftEdit::Quantity(4)).await.unwrap();
        assert_eq!(outcome, RecomputeOutcome::Updated);
        assert_eq!(collaborator.calls.load(Ordering::SeqCst), 3);
        assert_eq!(session.summary().await.total.amount_cents, 400);
    }

    #[tokio::test]
    async fn test_failed_recompute_keeps_last_good_price() {
        let collaborator = Arc::new(FlakyCollaborator::new(0));
        let session = session_over(collaborator.clone(), 2);

        session.apply(DraftEdit::Quantity(2)).await.unwrap();
        assert_eq!(session.summary().await.total.amount_cents, 200);

        // Every attempt of the next recompute fails.
        collaborator.fail_remaining.store(10, Ordering::SeqCst);
        let err = session.apply(DraftEdit::Quantity(5)).await.unwrap_err();
        assert!(matches!(err, SessionError::Pricing(_)));

        let summary = session.summary().await;
        assert_eq!(summary.price_state, PriceState::Failed);
        // Last good values are not zeroed.
        assert_eq!(summary.total.amount_cents, 200);

        // A further edit retries and recovers.
        collaborator.fail_remaining.store(0, Ordering::SeqCst);
        session.apply(DraftEdit::Quantity(3)).await.unwrap();
        let summary = session.summary().await;
        assert_eq!(summary.price_state, PriceState::Current);
        assert_eq!(summary.total.amount_cents, 300);
    }

    #[tokio::test]
    async fn test_upload_success_sets_handle_and_reprices() {
        let collaborator = Arc::new(FlakyCollaborator::new(0));
        let session = session_over(collaborator.clone(), 1);

        let outcome = session
            .upload_file(b"%PDF-", "application/pdf", "doc.pdf")
            .await
            .unwrap();
        assert_eq!(outcome, RecomputeOutcome::Updated);

        let draft = session.snapshot().await;
        assert_eq!(draft.file_id, Some(FileId::new("f-77")));
        assert_eq!(draft.file_name.as_deref(), Some("doc.pdf"));
        // Upload plus the triggered quote.
        assert_eq!(collaborator.calls.load(Ordering::SeqCst), 2);
        assert!(session.summary().await.can_add_to_cart);
    }

    #[tokio::test]
    async fn test_upload_failure_rolls_back_file_fields() {
        let collaborator = Arc::new(FlakyCollaborator::new(10));
        let session = session_over(collaborator.clone(), 2);

        let err = session
            .upload_file(b"%PDF-", "application/pdf", "doc.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Upload(_)));
        assert_eq!(collaborator.calls.load(Ordering::SeqCst), 2);

        let draft = session.snapshot().await;
        assert!(draft.file_id.is_none());
        assert!(draft.file_name.is_none());
        assert!(!session.summary().await.can_add_to_cart);
    }

    #[tokio::test]
    async fn test_oversized_upload_fails_without_attempts() {
        let collaborator = Arc::new(FlakyCollaborator::new(0));
        let session = ConfigurationSession::new(
            PricingClient::new(collaborator.clone()).with_policy(fast_policy(1)),
            FileUploadClient::new(collaborator.clone())
                .with_policy(fast_policy(3))
                .with_max_file_size(4),
        );

        let err = session
            .upload_file(b"too big", "application/pdf", "doc.pdf")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Upload(ClientError::FileTooLarge { .. })
        ));
        assert_eq!(collaborator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_to_cart_item_requires_readiness() {
        let collaborator = Arc::new(FlakyCollaborator::new(0));
        let session = session_over(collaborator, 1);

        let err = session.to_cart_item().await.unwrap_err();
        assert!(matches!(err, SessionError::NotReady(_)));

        session
            .upload_file(b"%PDF-", "application/pdf", "doc.pdf")
            .await
            .unwrap();
        assert!(session.to_cart_item().await.is_ok());
    }

    #[tokio::test]
    async fn test_reset_discards_draft_and_edit_mode() {
        let collaborator = Arc::new(FlakyCollaborator::new(0));
        let session = session_over(collaborator, 1);

        session.apply(DraftEdit::Quantity(9)).await.unwrap();
        session.reset().await;

        let summary = session.summary().await;
        assert_eq!(summary.quantity, 1);
        assert_eq!(summary.price_state, PriceState::Unpriced);
        assert!(summary.total.is_zero());
        assert!(session.editing().await.is_none());
    }
}
