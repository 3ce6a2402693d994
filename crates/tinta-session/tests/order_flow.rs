//! End-to-end order composition flows against a scripted collaborator.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tinta_client::{
    BackoffStrategy, ClientError, Collaborator, FileUploadClient, OrderClient, PricingClient,
    RetryPolicy,
};
use tinta_commerce::config::DraftEdit;
use tinta_commerce::contact::{CustomerContact, DeliveryMethod};
use tinta_commerce::ids::BranchId;
use tinta_commerce::nav::{ConfigStep, Navigator, View};
use tinta_session::{
    CartStore, CheckoutSession, ConfigurationSession, PriceState, SubmitOutcome,
};
use tinta_store::Store;

/// Answers every action like the production endpoint: uploads get a file
/// handle, quotes are priced at $1.50 per page per copy, orders get a
/// folio. Bodies are recorded for inspection.
struct StubEndpoint {
    bodies: Mutex<Vec<serde_json::Value>>,
}

impl StubEndpoint {
    fn new() -> Self {
        Self {
            bodies: Mutex::new(Vec::new()),
        }
    }

    fn sent(&self) -> Vec<serde_json::Value> {
        self.bodies.lock().unwrap().clone()
    }
}

#[async_trait]
impl Collaborator for StubEndpoint {
    async fn post(&self, body: String) -> Result<String, ClientError> {
        let sent: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| ClientError::Malformed(e.to_string()))?;
        self.bodies.lock().unwrap().push(sent.clone());

        match sent["action"].as_str() {
            Some("uploadFile") => Ok(format!(
                r#"{{"status":"success","fileId":"drive-001","fileName":{}}}"#,
                sent["fileName"]
            )),
            Some("getPrice") => {
                let pages = sent["options"]["pageCount"].as_u64().unwrap_or(1);
                let copies = sent["options"]["cantidad"].as_u64().unwrap_or(1);
                let total = 1.50 * pages as f64 * copies as f64;
                Ok(format!(
                    r#"{{"status":"success","pagePrice":1.50,"total":{total:.2}}}"#
                ))
            }
            Some("submitOrder") => {
                Ok(r#"{"status":"success","folio":"LUM-2024-0091"}"#.to_string())
            }
            _ => Ok(r#"{"status":"error","message":"unknown action"}"#.to_string()),
        }
    }
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy::new(3).with_backoff(BackoffStrategy::Linear {
        base: Duration::from_millis(1),
    })
}

struct Storefront {
    endpoint: Arc<StubEndpoint>,
    session: ConfigurationSession,
    cart: Arc<CartStore>,
    checkout: Arc<CheckoutSession>,
    nav: Navigator,
}

fn storefront(store: Store) -> Storefront {
    let endpoint = Arc::new(StubEndpoint::new());
    let collaborator: Arc<dyn Collaborator> = endpoint.clone();

    let session = ConfigurationSession::new(
        PricingClient::new(collaborator.clone()).with_policy(fast_policy()),
        FileUploadClient::new(collaborator.clone()).with_policy(fast_policy()),
    );
    let cart = Arc::new(CartStore::open(store).expect("open cart"));
    let checkout = Arc::new(CheckoutSession::new(
        cart.clone(),
        OrderClient::new(collaborator).with_policy(fast_policy()),
    ));

    Storefront {
        endpoint,
        session,
        cart,
        checkout,
        nav: Navigator::new(),
    }
}

fn complete_form() -> (CustomerContact, DeliveryMethod) {
    (
        CustomerContact {
            name: "Ana Torres".to_string(),
            email: "ana@example.com".to_string(),
            phone: "555-123-4567".to_string(),
        },
        DeliveryMethod::Pickup {
            branch: BranchId::new("centro"),
        },
    )
}

#[tokio::test]
async fn configure_add_and_submit_order() {
    let store = Store::in_memory();
    let mut shop = storefront(store.clone());

    // Configure: upload, confirm pages, choose options.
    shop.nav.begin_configuration().unwrap();
    shop.session
        .upload_file(b"%PDF-1.7 ...", "application/pdf", "tesis.pdf")
        .await
        .unwrap();
    shop.nav.go_to_step(ConfigStep::Preview).unwrap();
    shop.session.apply_detected_page_count(4).await.unwrap();
    shop.nav.go_to_step(ConfigStep::Options).unwrap();
    shop.session.apply(DraftEdit::Quantity(2)).await.unwrap();

    let summary = shop.session.summary().await;
    assert_eq!(summary.price_state, PriceState::Current);
    // 4 pages x 2 copies x $1.50.
    assert_eq!(summary.total.amount_cents, 1200);
    assert_eq!(summary.subtotal_per_copy.amount_cents, 600);
    assert!(summary.can_add_to_cart);

    // Commit to the cart and reset for the next job.
    let draft = shop.session.to_cart_item().await.unwrap();
    let item_id = shop.cart.add(&draft).await.unwrap();
    shop.session.reset().await;

    // Checkout renders from the cart.
    shop.nav.enter_checkout(shop.cart.is_empty().await).unwrap();
    let view = shop.checkout.render().await.unwrap();
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].id, item_id);
    assert_eq!(view.total.amount_cents, 1200);

    // Fill the form and submit.
    let (contact, delivery) = complete_form();
    shop.checkout.set_contact(contact).await;
    shop.checkout.set_delivery(delivery).await;
    shop.checkout.set_terms_accepted(true).await;
    let outcome = shop.checkout.submit().await.unwrap();
    let SubmitOutcome::Submitted(folio) = outcome else {
        panic!("expected a folio");
    };
    assert_eq!(folio.as_str(), "LUM-2024-0091");

    shop.nav.order_confirmed().unwrap();
    assert_eq!(shop.nav.view(), View::Confirmation);
    assert!(shop.cart.is_empty().await);

    // The cleared cart is what persists.
    let reopened = CartStore::open(store).unwrap();
    assert!(reopened.is_empty().await);

    // The order payload carried the configured item.
    let sent = shop.endpoint.sent();
    let order = sent
        .iter()
        .find(|v| v["action"] == "submitOrder")
        .expect("order sent");
    assert_eq!(order["cliente"]["telefono"], "555-123-4567");
    assert_eq!(order["cliente"]["metodoEntrega"], "sucursal");
    assert_eq!(order["items"][0]["fileId"], "drive-001");
    assert_eq!(order["items"][0]["cantidad"], 2);
    assert_eq!(order["items"][0]["pageCount"], 4);
}

#[tokio::test]
async fn edit_cart_item_preserves_identity() {
    let store = Store::in_memory();
    let mut shop = storefront(store);

    // One configured item in the cart.
    shop.nav.begin_configuration().unwrap();
    shop.session
        .upload_file(b"bytes", "image/png", "poster.png")
        .await
        .unwrap();
    shop.session.apply(DraftEdit::Quantity(1)).await.unwrap();
    let draft = shop.session.to_cart_item().await.unwrap();
    let item_id = shop.cart.add(&draft).await.unwrap();
    shop.session.reset().await;

    // Edit from checkout: seed the session, bypassing upload.
    shop.nav.enter_checkout(false).unwrap();
    let seeded = shop.cart.seed_for_edit(&item_id).await.unwrap();
    let item = shop.cart.get(&item_id).await.unwrap();
    shop.session.seed_from_item(&item).await;
    shop.nav.begin_edit().unwrap();
    assert_eq!(shop.nav.step(), ConfigStep::Options);
    assert_eq!(seeded.file_id, item.file_id);

    // The inherited price is trusted until the draft changes.
    assert_eq!(shop.session.price_state().await, PriceState::Current);

    shop.session.apply(DraftEdit::Quantity(5)).await.unwrap();
    let updated = shop.session.to_cart_item().await.unwrap();
    shop.cart.commit_edit(&item_id, &updated).await.unwrap();
    shop.session.reset().await;

    let items = shop.cart.items().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, item_id);
    assert_eq!(items[0].quantity, 5);
    // 1 page x 5 copies x $1.50; the file handle survived the edit.
    assert_eq!(items[0].total.amount_cents, 750);
    assert_eq!(items[0].file_id, item.file_id);
    assert!(shop.cart.editing().await.is_none());
}

#[tokio::test]
async fn removing_last_item_empties_checkout() {
    let mut shop = storefront(Store::in_memory());

    shop.nav.begin_configuration().unwrap();
    shop.session
        .upload_file(b"bytes", "application/pdf", "doc.pdf")
        .await
        .unwrap();
    let draft = shop.session.to_cart_item().await.unwrap();
    let item_id = shop.cart.add(&draft).await.unwrap();

    shop.nav.enter_checkout(false).unwrap();
    let outcome = shop.cart.remove(&item_id).await.unwrap();
    assert_eq!(outcome, tinta_commerce::cart::RemoveOutcome::CartEmptied);

    // The caller navigates away; checkout is gone for an empty cart.
    shop.nav.browse(View::Home).unwrap();
    assert!(shop.nav.enter_checkout(shop.cart.is_empty().await).is_err());

    let view = shop.checkout.render().await.unwrap();
    assert!(view.is_empty);
}
