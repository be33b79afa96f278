//! End-to-end storefront flows over the in-memory store.

use amcros_app::prelude::*;
use amcros_app::FALLBACK_REPLY;
use amcros_commerce::checkout::{CheckoutStep, OrderStatus, SequentialOrderNumbers};
use amcros_commerce::profile::SignUpDetails;
use amcros_store::{
    Collection, Document, DocumentStore, MemoryStore, StoreError, StoreResult,
    Subscription,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Delegates to a memory store, failing or stalling the next order writes.
struct FlakyStore {
    inner: MemoryStore,
    failing_writes: AtomicU32,
    stall: Option<Stall>,
}

#[derive(Clone, Copy)]
enum Stall {
    /// Wait, then write.
    BeforeWrite(Duration),
    /// Write, then wait before answering.
    AfterWrite(Duration),
}

impl FlakyStore {
    fn failing(times: u32) -> Self {
        Self {
            inner: MemoryStore::new(),
            failing_writes: AtomicU32::new(times),
            stall: None,
        }
    }

    fn stalling(stall: Stall) -> Self {
        Self {
            inner: MemoryStore::new(),
            failing_writes: AtomicU32::new(0),
            stall: Some(stall),
        }
    }

    async fn write_order(&self, write: impl std::future::Future<Output = StoreResult<()>>) -> StoreResult<()> {
        if let Some(Stall::BeforeWrite(delay)) = self.stall {
            tokio::time::sleep(delay).await;
        }
        let failed = self
            .failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(StoreError::Unavailable("network down".to_string()));
        }
        write.await?;
        if let Some(Stall::AfterWrite(delay)) = self.stall {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        self.inner.get(collection, id).await
    }

    async fn set(&self, collection: Collection, id: &str, data: Value) -> StoreResult<()> {
        if collection == Collection::Orders {
            return self.write_order(self.inner.set(collection, id, data)).await;
        }
        self.inner.set(collection, id, data).await
    }

    async fn update(&self, collection: Collection, id: &str, fields: Value) -> StoreResult<()> {
        self.inner.update(collection, id, fields).await
    }

    async fn create(&self, collection: Collection, data: Value) -> StoreResult<String> {
        self.inner.create(collection, data).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()> {
        self.inner.delete(collection, id).await
    }

    async fn list(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        self.inner.list(collection).await
    }

    async fn query_eq(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Document>> {
        self.inner.query_eq(collection, field, value).await
    }

    fn subscribe(&self, collection: Collection) -> Subscription {
        self.inner.subscribe(collection)
    }
}

fn config() -> AppConfig {
    let mut config = AppConfig::default();
    config.store.backend = amcros_app::config::StoreBackend::Memory;
    config.admin.emails = vec![Email::parse("owner@amcros.in").unwrap()];
    config
}

async fn app_over(store: Arc<dyn DocumentStore>) -> App {
    let app = App::with_store(config(), store).await.unwrap();
    app.catalog()
        .seed(&[
            Product::new("test-socks", "Test Socks")
                .with_style("ankle")
                .with_variant(3, Money::from_rupees(100))
                .with_variant(5, Money::from_rupees(50)),
            Product::new("premium-socks", "Premium Socks").with_variant(1, Money::from_paise(5001)),
        ])
        .await
        .unwrap();
    app
}

async fn buyer(app: &App) -> Session {
    app.accounts()
        .sign_up("buyer@mill.in", "socks123", SignUpDetails::new("Mill Traders", ""))
        .await
        .unwrap()
}

#[tokio::test]
async fn two_three_packs_at_100_total_216() {
    let app = app_over(Arc::new(MemoryStore::new())).await;
    let session = buyer(&app).await;
    let product = app.catalog().get("test-socks").await.unwrap();

    let mut cart = app.cart(&session).await;
    cart.add_item(&product, 3, 2).await.unwrap();
    let pricing = cart.pricing();
    assert_eq!(pricing.subtotal, Money::from_rupees(200));
    assert_eq!(pricing.tax, Money::from_rupees(16));
    assert_eq!(pricing.shipping, Money::ZERO);
    assert_eq!(pricing.total, Money::from_rupees(216));

    let mut checkout = app.checkout();
    let order = checkout.place(&session, &mut cart).await.unwrap();
    assert!(order.order_number.starts_with("AMC"));
    assert_eq!(order.order_number.len(), 9);
    assert_eq!(order.status, OrderStatus::Processing);
    assert_eq!(order.total, Money::from_rupees(216));
    assert_eq!(
        order.estimated_delivery - order.order_date,
        chrono::Duration::days(7)
    );

    let stored = app
        .store()
        .get(Collection::Orders, order.id.as_ref().unwrap().as_str())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.data["paymentMethod"], "Cash on Delivery");
    assert_eq!(stored.data["items"][0]["variant"], "3 Pack");
    assert_eq!(stored.data["total"], 216.0);
}

#[tokio::test]
async fn empty_cart_costs_only_shipping() {
    let app = app_over(Arc::new(MemoryStore::new())).await;
    let session = buyer(&app).await;

    let cart = app.cart(&session).await;
    let pricing = cart.pricing();
    assert_eq!(pricing.subtotal, Money::ZERO);
    assert_eq!(pricing.tax, Money::ZERO);
    assert_eq!(pricing.total, Money::from_paise(599));
}

#[tokio::test]
async fn free_shipping_only_strictly_above_fifty() {
    let app = app_over(Arc::new(MemoryStore::new())).await;
    let session = buyer(&app).await;
    let test_socks = app.catalog().get("test-socks").await.unwrap();
    let premium = app.catalog().get("premium-socks").await.unwrap();

    let mut cart = app.cart(&session).await;
    cart.add_item(&test_socks, 5, 1).await.unwrap();
    assert_eq!(cart.pricing().subtotal, Money::from_rupees(50));
    assert_eq!(cart.pricing().shipping, Money::from_paise(599));

    cart.clear().await.unwrap();
    cart.add_item(&premium, 1, 1).await.unwrap();
    assert_eq!(cart.pricing().shipping, Money::ZERO);
}

#[tokio::test]
async fn decrement_below_one_removes_the_row() {
    let app = app_over(Arc::new(MemoryStore::new())).await;
    let session = buyer(&app).await;
    let product = app.catalog().get("test-socks").await.unwrap();

    let mut cart = app.cart(&session).await;
    cart.add_item(&product, 3, 2).await.unwrap();
    cart.add_item(&product, 5, 1).await.unwrap();
    cart.update_quantity(0, -5).await.unwrap();

    assert_eq!(cart.items().len(), 1);
    assert!(cart.items().iter().all(|item| item.quantity >= 1));

    let reloaded = app.cart(&session).await;
    assert_eq!(reloaded.items(), cart.items());
}

#[tokio::test]
async fn failed_write_returns_to_review_and_retry_places_once() {
    let store = Arc::new(FlakyStore::failing(1));
    let app = app_over(store.clone()).await;
    let session = buyer(&app).await;
    let product = app.catalog().get("test-socks").await.unwrap();

    let mut cart = app.cart(&session).await;
    cart.add_item(&product, 3, 2).await.unwrap();

    let mut checkout = app.checkout();
    let err = checkout.place(&session, &mut cart).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(checkout.step(), CheckoutStep::Reviewing);
    assert_eq!(checkout.flow().failed_attempts(), 1);
    assert_eq!(store.inner.count(Collection::Orders).await, 0);
    assert_eq!(cart.items().len(), 1);

    let order = checkout.place(&session, &mut cart).await.unwrap();
    assert_eq!(checkout.step(), CheckoutStep::Placed);
    assert_eq!(store.inner.count(Collection::Orders).await, 1);
    assert_eq!(app.orders().for_user(&session).await.unwrap()[0].order_number, order.order_number);
    assert!(cart.is_empty());
}

#[tokio::test]
async fn slow_write_times_out_back_to_review() {
    let store = Arc::new(FlakyStore::stalling(Stall::BeforeWrite(Duration::from_millis(500))));
    let app = app_over(store.clone()).await;
    let session = buyer(&app).await;
    let product = app.catalog().get("test-socks").await.unwrap();

    let mut cart = app.cart(&session).await;
    cart.add_item(&product, 3, 1).await.unwrap();

    let mut checkout = amcros_app::CheckoutWorkflow::new(
        store.clone(),
        Arc::new(SequentialOrderNumbers::default()),
    )
    .with_timeout(Some(Duration::from_millis(20)));
    let err = checkout.place(&session, &mut cart).await.unwrap_err();
    assert!(matches!(err, AppError::CheckoutTimedOut(_)));
    assert_eq!(checkout.step(), CheckoutStep::Reviewing);
    assert_eq!(store.inner.count(Collection::Orders).await, 0);
}

#[tokio::test]
async fn retry_after_a_late_write_keeps_a_single_order() {
    let store = Arc::new(FlakyStore::stalling(Stall::AfterWrite(Duration::from_millis(200))));
    let app = app_over(store.clone()).await;
    let session = buyer(&app).await;
    let product = app.catalog().get("test-socks").await.unwrap();

    let mut cart = app.cart(&session).await;
    cart.add_item(&product, 3, 2).await.unwrap();

    let mut checkout = amcros_app::CheckoutWorkflow::new(
        store.clone(),
        Arc::new(SequentialOrderNumbers::default()),
    )
    .with_timeout(Some(Duration::from_millis(50)));

    let err = checkout.place(&session, &mut cart).await.unwrap_err();
    assert!(matches!(err, AppError::CheckoutTimedOut(_)));
    assert_eq!(checkout.step(), CheckoutStep::Reviewing);
    assert_eq!(store.inner.count(Collection::Orders).await, 1);

    let order = checkout.place(&session, &mut cart).await.unwrap();
    assert_eq!(order.order_number, "AMC000001");
    assert_eq!(checkout.step(), CheckoutStep::Placed);
    assert_eq!(store.inner.count(Collection::Orders).await, 1);
    assert!(cart.is_empty());

    let stored = app.orders().for_user(&session).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, order.id);
}

#[tokio::test]
async fn changed_cart_after_a_failed_write_gets_a_new_order_number() {
    let store = Arc::new(FlakyStore::failing(1));
    let app = app_over(store.clone()).await;
    let session = buyer(&app).await;
    let product = app.catalog().get("test-socks").await.unwrap();

    let mut cart = app.cart(&session).await;
    cart.add_item(&product, 3, 1).await.unwrap();

    let mut checkout = amcros_app::CheckoutWorkflow::new(
        store.clone(),
        Arc::new(SequentialOrderNumbers::default()),
    );
    assert!(checkout.place(&session, &mut cart).await.is_err());

    cart.add_item(&product, 5, 1).await.unwrap();
    let order = checkout.place(&session, &mut cart).await.unwrap();
    assert_eq!(order.order_number, "AMC000002");
    assert_eq!(order.items.len(), 2);
    assert_eq!(store.inner.count(Collection::Orders).await, 1);
}

#[tokio::test]
async fn storefront_shaped_orders_load_everywhere() {
    let app = app_over(Arc::new(MemoryStore::new())).await;
    let session = buyer(&app).await;
    app.store()
        .set(
            Collection::Orders,
            "legacy-1",
            json!({
                "email": "buyer@mill.in",
                "orderNumber": "AMC482913",
                "orderDate": "2025-03-01T10:00:00Z",
                "estimatedDelivery": "2025-03-08T10:00:00Z",
                "items": [{
                    "name": "Sports Socks",
                    "packSize": 3,
                    "quantity": 2,
                    "price": 250,
                    "timestamp": 1740823200000u64
                }],
                "subtotal": 500,
                "shipping": 0,
                "tax": 40,
                "total": 540,
                "paymentMethod": "Cash on Delivery",
                "status": "Processing"
            }),
        )
        .await
        .unwrap();
    app.store()
        .set(Collection::Orders, "broken", json!({"orderNumber": 7}))
        .await
        .unwrap();

    let mine = app.orders().for_user(&session).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].items[0].variant, "3 Pack");

    let owner = app
        .accounts()
        .sign_up("owner@amcros.in", "admin123", SignUpDetails::new("Amcros Hitex", ""))
        .await
        .unwrap();
    assert_eq!(app.admin(&owner).unwrap().all_orders().await.unwrap().len(), 1);

    let reply = app.chat().reply("what's my order status?", Some(session.email())).await;
    assert!(reply.contains("AMC482913"));
}

#[tokio::test]
async fn sequential_numbers_continue_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config();
    config.store.backend = amcros_app::config::StoreBackend::Json;
    config.store.data_dir = dir.path().to_path_buf();
    config.checkout.order_numbers = amcros_app::config::OrderNumberStrategy::Sequential;

    let mut numbers = Vec::new();
    for run in 0..2 {
        let app = App::from_config(config.clone()).await.unwrap();
        app.catalog()
            .seed(&[Product::new("test-socks", "Test Socks").with_variant(3, Money::from_rupees(100))])
            .await
            .unwrap();
        let session = if run == 0 {
            buyer(&app).await
        } else {
            app.accounts().sign_in("buyer@mill.in", "socks123").await.unwrap()
        };
        let product = app.catalog().get("test-socks").await.unwrap();
        let mut cart = app.cart(&session).await;
        cart.add_item(&product, 3, 1).await.unwrap();
        numbers.push(app.checkout().place(&session, &mut cart).await.unwrap().order_number);
    }
    assert_eq!(numbers, ["AMC000001", "AMC000002"]);
}

#[tokio::test]
async fn admin_cycles_a_placed_order() {
    let app = app_over(Arc::new(MemoryStore::new())).await;
    let session = buyer(&app).await;
    let product = app.catalog().get("test-socks").await.unwrap();
    let mut cart = app.cart(&session).await;
    cart.add_item(&product, 3, 1).await.unwrap();
    let order = app.checkout().place(&session, &mut cart).await.unwrap();
    let order_id = order.id.unwrap();

    assert!(matches!(app.admin(&session), Err(AppError::Forbidden)));

    let owner = app
        .accounts()
        .sign_up("owner@amcros.in", "admin123", SignUpDetails::new("Amcros Hitex", ""))
        .await
        .unwrap();
    let admin = app.admin(&owner).unwrap();
    assert_eq!(admin.all_orders().await.unwrap().len(), 1);

    let mut seen = Vec::new();
    for _ in 0..4 {
        seen.push(admin.advance_status(order_id.as_str()).await.unwrap());
    }
    assert_eq!(seen.last(), Some(&OrderStatus::Processing));
    assert!(seen.contains(&OrderStatus::Pending));

    let mine = app.orders().get(&session, order_id.as_str()).await.unwrap();
    assert_eq!(mine.status, OrderStatus::Processing);
}

#[tokio::test]
async fn chat_answers_from_orders_and_never_errors() {
    let app = app_over(Arc::new(MemoryStore::new())).await;
    let session = buyer(&app).await;
    let product = app.catalog().get("test-socks").await.unwrap();
    let mut cart = app.cart(&session).await;
    cart.add_item(&product, 3, 1).await.unwrap();
    let order = app.checkout().place(&session, &mut cart).await.unwrap();

    let reply = app.chat().reply("what's my order status?", Some(session.email())).await;
    assert!(reply.contains(&order.order_number));

    let mut generative = config();
    generative.chatbot.strategy = amcros_app::config::ChatStrategy::Generative;
    generative.chatbot.api_key_env = "AMCROS_TEST_NO_SUCH_KEY".to_string();
    let offline = App::with_store(generative, app.store().clone()).await.unwrap();
    assert_eq!(
        offline.chat().reply("hello", Some(session.email())).await,
        FALLBACK_REPLY
    );
}

#[tokio::test]
async fn notifications_reach_subscribers() {
    let app = app_over(Arc::new(MemoryStore::new())).await;
    let owner = app
        .accounts()
        .sign_up("owner@amcros.in", "admin123", SignUpDetails::new("Amcros Hitex", ""))
        .await
        .unwrap();

    let mut stream = app.notifications().subscribe();
    app.admin(&owner)
        .unwrap()
        .send_notification(NewNotification::new("New stock", "Designer socks are in"))
        .await
        .unwrap();

    let received = stream.next().await.unwrap();
    assert_eq!(received.title, "New stock");
    assert_eq!(app.notifications().list().await.unwrap().len(), 1);
}
