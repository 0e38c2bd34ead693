use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use ambassador_engine::{
    cache::{CacheInvalidationWorker, MemoryCache},
    events::EventProducers,
    order_objects::CompletionResult,
    payment_objects::{CheckoutSession, CheckoutSessionRequest},
    test_utils::{
        prepare_env::{prepare_test_env, random_db_path},
        seed::{seed_database, SeedData},
    },
    AmbassadorApi,
    OrderSettlementApi,
    PaymentSessionProvider,
    SettlementError,
    SqliteDatabase,
};
use cucumber::World;
use log::*;

/// A payment provider stand-in. Session ids are `cs_test_1`, `cs_test_2`, ... and every request is recorded.
#[derive(Debug, Clone, Default)]
pub struct FakeProvider {
    pub fail: Arc<AtomicBool>,
    pub calls: Arc<AtomicUsize>,
}

impl PaymentSessionProvider for FakeProvider {
    type Error = String;

    async fn create_checkout_session(&self, request: CheckoutSessionRequest) -> Result<CheckoutSession, String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail.load(Ordering::SeqCst) {
            return Err("the payment provider is unavailable".to_string());
        }
        trace!("🚀️ Fake provider received {} line items", request.line_items.len());
        Ok(CheckoutSession { id: format!("cs_test_{n}"), url: Some(format!("https://pay.example.com/cs_test_{n}")) })
    }
}

#[derive(Default, Debug, World)]
pub struct SettlementWorld {
    pub system: Option<SettlementSystem>,
    pub last_session: Option<CheckoutSession>,
    pub last_completion: Option<CompletionResult>,
    pub last_error: Option<SettlementError>,
}

#[derive(Debug)]
pub struct SettlementSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub cache: MemoryCache,
    pub provider: FakeProvider,
    pub seed: SeedData,
    pub api: OrderSettlementApi<SqliteDatabase, FakeProvider, MemoryCache>,
    pub ambassadors: AmbassadorApi<SqliteDatabase, MemoryCache>,
}

impl SettlementWorld {
    pub fn system(&self) -> &SettlementSystem {
        self.system.as_ref().expect("Settlement system not initialised")
    }
}

impl SettlementSystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        let db = prepare_test_env(&url).await;
        let seed = seed_database(&db).await;
        debug!("🚀️ Created database: {url}");
        let cache = MemoryCache::new();
        let (invalidator, _) = CacheInvalidationWorker::start(cache.clone(), Duration::from_millis(10));
        let provider = FakeProvider::default();
        let api = OrderSettlementApi::new(
            db.clone(),
            provider.clone(),
            cache.clone(),
            invalidator,
            EventProducers::default(),
        );
        let ambassadors = AmbassadorApi::new(db.clone(), cache.clone());
        Self { db_path: url, db, cache, provider, seed, api, ambassadors }
    }

    pub fn product_id(&self, title: &str) -> i64 {
        self.seed.products.iter().find(|p| p.title == title).map(|p| p.id).expect("Unknown product title")
    }
}
