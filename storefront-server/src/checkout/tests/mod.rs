//! Checkout workflow tests
//!
//! Each test runs against its own embedded database in a temp directory.

mod test_intake;
mod test_verify;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tempfile::TempDir;

use super::*;
use crate::db::DbService;
use crate::db::models::{
    OrderTotals, ProductCreate, Purchaser, ShippingAddress,
};
use crate::db::repository::{OrderRepository, ProductRepository};
use crate::inventory::InventoryLedger;
use crate::notify::{Notification, Notifier, NotifierError};

/// Notifier that records everything it is asked to send
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifierError> {
        self.sent.lock().push(notification.clone());
        Ok(())
    }
}

/// Notifier whose every call fails
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _notification: &Notification) -> Result<(), NotifierError> {
        Err(NotifierError::Endpoint(500))
    }
}

pub struct TestCtx {
    _tmp: TempDir,
    pub products: ProductRepository,
    pub orders: OrderRepository,
    pub ledger: Arc<InventoryLedger>,
    pub intake: OrderIntake,
    pub lifecycle: OrderLifecycle,
    pub verifier: OrderVerifier,
    pub recorder: Arc<RecordingNotifier>,
}

const TEST_NOTIFY_TIMEOUT: Duration = Duration::from_millis(500);

/// Fixture over a fresh database with a recording notifier
pub async fn create_test_ctx() -> TestCtx {
    let recorder = Arc::new(RecordingNotifier::default());
    create_test_ctx_with(recorder.clone()).await
}

/// Fixture with a caller-chosen notifier
pub async fn create_failing_notifier_ctx() -> TestCtx {
    let mut ctx = create_test_ctx().await;
    let notifier: Arc<dyn Notifier> = Arc::new(FailingNotifier);
    ctx.intake = OrderIntake::new(
        ctx.ledger.clone(),
        ctx.orders.clone(),
        notifier.clone(),
        TEST_NOTIFY_TIMEOUT,
    );
    ctx.lifecycle = OrderLifecycle::new(ctx.orders.clone(), notifier, TEST_NOTIFY_TIMEOUT);
    ctx
}

async fn create_test_ctx_with(recorder: Arc<RecordingNotifier>) -> TestCtx {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("storefront.db");
    let db_service = DbService::new(&db_path.to_string_lossy()).await.unwrap();
    let db = db_service.db;

    let products = ProductRepository::new(db.clone());
    let orders = OrderRepository::new(db.clone());
    let ledger = Arc::new(InventoryLedger::new(products.clone()));
    let notifier: Arc<dyn Notifier> = recorder.clone();

    TestCtx {
        _tmp: tmp,
        products: products.clone(),
        orders: orders.clone(),
        ledger: ledger.clone(),
        intake: OrderIntake::new(ledger.clone(), orders.clone(), notifier.clone(), TEST_NOTIFY_TIMEOUT),
        lifecycle: OrderLifecycle::new(orders.clone(), notifier, TEST_NOTIFY_TIMEOUT),
        verifier: OrderVerifier::new(orders),
        recorder,
    }
}

impl TestCtx {
    /// Seed a product, returning its `product:<key>` id
    pub async fn seed_product(&self, name: &str, price: i64, stock: i64) -> String {
        let product = self
            .products
            .create(ProductCreate {
                name: name.to_string(),
                description: None,
                image: Some(format!("/images/{name}.jpg")),
                price,
                stock: Some(stock),
            })
            .await
            .unwrap();
        product.id.unwrap().to_string()
    }

    /// Current stock of a product
    pub async fn stock_of(&self, product_id: &str) -> i64 {
        self.products
            .find_by_id(product_id)
            .await
            .unwrap()
            .unwrap()
            .stock
    }
}

pub fn guest_purchaser() -> Purchaser {
    Purchaser::Guest {
        name: "Jane Doe".into(),
        email: "Jane@Example.com".into(),
        phone: "555-0100".into(),
    }
}

pub fn registered_purchaser(user_id: &str, email: &str) -> Purchaser {
    Purchaser::Registered {
        user_id: user_id.into(),
        name: "Bob Smith".into(),
        email: email.into(),
        phone: Some("555-0200".into()),
    }
}

pub fn test_address() -> ShippingAddress {
    ShippingAddress {
        street: "1 Main St".into(),
        city: "Springfield".into(),
        postal_code: "12345".into(),
        country: "US".into(),
    }
}

pub fn test_totals(grand_total: i64) -> OrderTotals {
    OrderTotals {
        items_subtotal: grand_total,
        tax: 0,
        shipping: 0,
        grand_total,
    }
}

/// Build a cash-on-delivery place-order request for the given lines
pub fn place_request(items: Vec<CartLine>, purchaser: Purchaser) -> PlaceOrder {
    PlaceOrder {
        items,
        shipping_address: test_address(),
        payment_method: "Cash on Delivery".into(),
        totals: test_totals(1000),
        purchaser,
    }
}

pub fn line(product_id: &str, quantity: i32) -> CartLine {
    CartLine {
        product_id: product_id.to_string(),
        quantity,
    }
}
