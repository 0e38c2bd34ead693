use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use ambassador_engine::{
    cache::{CacheInvalidationWorker, CacheInvalidator},
    events::EventProducers,
    AmbassadorApi,
    CatalogApi,
    OrderSettlementApi,
    SettlementDatabase,
    SqliteDatabase,
    UserApi,
};
use log::*;

use crate::{
    cache_backend::CacheBackend,
    config::ServerConfig,
    errors::ServerError,
    integrations::stripe::StripeSessionProvider,
    notifications::create_notification_event_handlers,
    routes::{
        health,
        AmbassadorUserRoute,
        AmbassadorsRoute,
        ConfirmOrderRoute,
        CreateOrderRoute,
        CreateProductRoute,
        DeleteProductRoute,
        LinkRoute,
        OrdersRoute,
        ProductsBackendRoute,
        ProductsFrontendRoute,
        RankingsRoute,
        RegisterRoute,
        StatsRoute,
        UpdateInfoRoute,
        UpdateProductRoute,
        UserLinksRoute,
    },
};

pub type SettlementApi = OrderSettlementApi<SqliteDatabase, StripeSessionProvider, CacheBackend>;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let busy_timeout = config.database_busy_timeout();
    let db = SqliteDatabase::new_with_busy_timeout(&config.database_url, config.max_connections, busy_timeout)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🗃️ Database ready at {}", db.url());
    let cache = CacheBackend::connect(config.redis_url.as_deref())
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let provider =
        StripeSessionProvider::new(config.stripe.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    // One worker for the lifetime of the process. Every API shares its invalidator.
    let (invalidator, _worker) = CacheInvalidationWorker::start(cache.clone(), config.cache_clear_delay);
    let handlers = create_notification_event_handlers(config.mail.clone());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, cache, provider, invalidator, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    cache: CacheBackend,
    provider: StripeSessionProvider,
    invalidator: CacheInvalidator,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    info!("💻️ Binding to {}:{}", config.host, config.port);
    let checkout = config.checkout.clone();
    let srv = HttpServer::new(move || {
        let settlement_api = SettlementApi::new(
            db.clone(),
            provider.clone(),
            cache.clone(),
            invalidator.clone(),
            producers.clone(),
        )
        .with_checkout_config(checkout.clone());
        let ambassador_api = AmbassadorApi::new(db.clone(), cache.clone());
        let catalog_api = CatalogApi::new(db.clone(), cache.clone(), invalidator.clone());
        let user_api = UserApi::new(db.clone(), invalidator.clone());
        let api_scope = web::scope("/api")
            .service(CreateOrderRoute::<SqliteDatabase, StripeSessionProvider, CacheBackend>::new())
            .service(ConfirmOrderRoute::<SqliteDatabase, StripeSessionProvider, CacheBackend>::new())
            .service(LinkRoute::<SqliteDatabase, StripeSessionProvider, CacheBackend>::new())
            .service(OrdersRoute::<SqliteDatabase, StripeSessionProvider, CacheBackend>::new())
            .service(AmbassadorsRoute::<SqliteDatabase, CacheBackend>::new())
            .service(UserLinksRoute::<SqliteDatabase, CacheBackend>::new())
            .service(CreateProductRoute::<SqliteDatabase, CacheBackend>::new())
            .service(UpdateProductRoute::<SqliteDatabase, CacheBackend>::new())
            .service(DeleteProductRoute::<SqliteDatabase, CacheBackend>::new())
            .service(ProductsFrontendRoute::<SqliteDatabase, CacheBackend>::new())
            .service(ProductsBackendRoute::<SqliteDatabase, CacheBackend>::new())
            .service(AmbassadorUserRoute::<SqliteDatabase, CacheBackend>::new())
            .service(StatsRoute::<SqliteDatabase, CacheBackend>::new())
            .service(RankingsRoute::<SqliteDatabase, CacheBackend>::new())
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(UpdateInfoRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("amb::access_log"))
            .app_data(web::Data::new(settlement_api))
            .app_data(web::Data::new(ambassador_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(user_api))
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
