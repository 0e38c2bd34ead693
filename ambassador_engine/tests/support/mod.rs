#![allow(dead_code)]
use std::{
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use ambassador_engine::{
    cache::{CacheInvalidationWorker, CacheInvalidator, MemoryCache},
    events::{EventHandlers, EventHooks, EventProducers},
    order_objects::{CreateOrderRequest, ProductQuantity},
    payment_objects::{CheckoutSession, CheckoutSessionRequest},
    test_utils::{
        prepare_env::{prepare_test_env, random_db_path},
        seed::{seed_database, SeedData},
    },
    OrderSettlementApi,
    PaymentSessionProvider,
    SqliteDatabase,
};
use mockall::mock;

mock! {
    pub Provider {}
    impl PaymentSessionProvider for Provider {
        type Error = String;
        async fn create_checkout_session(&self, request: CheckoutSessionRequest) -> Result<CheckoutSession, String>;
    }
}

pub struct TestContext {
    pub url: String,
    pub db: SqliteDatabase,
    pub cache: MemoryCache,
    pub invalidator: CacheInvalidator,
    pub seed: SeedData,
}

impl TestContext {
    pub async fn new() -> Self {
        let url = random_db_path();
        let db = prepare_test_env(&url).await;
        let seed = seed_database(&db).await;
        let cache = MemoryCache::new();
        let (invalidator, _handle) = CacheInvalidationWorker::start(cache.clone(), Duration::ZERO);
        Self { url, db, cache, invalidator, seed }
    }

    pub fn settlement_api(
        &self,
        provider: MockProvider,
        producers: EventProducers,
    ) -> OrderSettlementApi<SqliteDatabase, MockProvider, MemoryCache> {
        OrderSettlementApi::new(self.db.clone(), provider, self.cache.clone(), self.invalidator.clone(), producers)
    }

    pub async fn count_rows(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(self.db.pool())
            .await
            .expect("Error counting rows")
    }
}

/// Gives the invalidation worker a chance to drain its queue.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

pub fn order_request(code: &str, products: &[(i64, i64)]) -> CreateOrderRequest {
    CreateOrderRequest {
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        email: "jane@example.com".into(),
        address: "1 Main St".into(),
        country: "US".into(),
        city: "Springfield".into(),
        zip: "12345".into(),
        code: code.into(),
        products: products.iter().map(|&(id, qty)| ProductQuantity::new(id, qty)).collect(),
    }
}

/// A provider that accepts every request and hands out session ids `cs_test_{n}`.
pub fn accepting_provider() -> MockProvider {
    let counter = AtomicUsize::new(0);
    let mut provider = MockProvider::new();
    provider.expect_create_checkout_session().returning(move |_| {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(CheckoutSession { id: format!("cs_test_{n}"), url: Some(format!("https://pay.example.com/cs_test_{n}")) })
    });
    provider
}

/// A provider that takes `delay` to create the first session, and answers immediately afterwards.
pub struct SlowProvider {
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay, calls: AtomicUsize::new(0) }
    }
}

impl PaymentSessionProvider for SlowProvider {
    type Error = String;

    async fn create_checkout_session(&self, _request: CheckoutSessionRequest) -> Result<CheckoutSession, String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n == 1 {
            tokio::time::sleep(self.delay).await;
        }
        Ok(CheckoutSession { id: format!("cs_slow_{n}"), url: None })
    }
}

/// Starts an order-completed hook that counts the events it receives.
pub async fn counting_hooks() -> (EventProducers, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    let mut hooks = EventHooks::default();
    hooks.on_order_completed(move |_ev| {
        let c = c.clone();
        Box::pin(async move {
            c.fetch_add(1, Ordering::SeqCst);
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    let handlers = EventHandlers::new(10, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    (producers, count)
}
