use std::time::Duration;

use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use ambassador_engine::{
    cache::{CacheInvalidationWorker, CacheInvalidator, KeyValueCache, MemoryCache, RANKINGS_KEY},
    db_types::ReferralLink,
    traits::{AmbassadorManagementError, CatalogManagementError},
    AmbassadorApi,
    CatalogApi,
};
use serde_json::json;

use super::{
    fixtures::{alice, bob, completed_order, product},
    helpers::{parse_json, send_request},
    mocks::{MockAmbassadorStore, MockCatalogStore},
};
use crate::{
    auth::USER_ID_HEADER,
    routes::{
        AmbassadorUserRoute,
        AmbassadorsRoute,
        CreateProductRoute,
        DeleteProductRoute,
        ProductsBackendRoute,
        ProductsFrontendRoute,
        RankingsRoute,
        StatsRoute,
        UpdateProductRoute,
        UserLinksRoute,
    },
};

fn configure_ambassadors(api: AmbassadorApi<MockAmbassadorStore, MemoryCache>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(api))
            .service(AmbassadorsRoute::<MockAmbassadorStore, MemoryCache>::new())
            .service(UserLinksRoute::<MockAmbassadorStore, MemoryCache>::new())
            .service(AmbassadorUserRoute::<MockAmbassadorStore, MemoryCache>::new())
            .service(StatsRoute::<MockAmbassadorStore, MemoryCache>::new())
            .service(RankingsRoute::<MockAmbassadorStore, MemoryCache>::new());
    }
}

fn configure_catalog(api: CatalogApi<MockCatalogStore, MemoryCache>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(api))
            .service(CreateProductRoute::<MockCatalogStore, MemoryCache>::new())
            .service(UpdateProductRoute::<MockCatalogStore, MemoryCache>::new())
            .service(DeleteProductRoute::<MockCatalogStore, MemoryCache>::new())
            .service(ProductsFrontendRoute::<MockCatalogStore, MemoryCache>::new())
            .service(ProductsBackendRoute::<MockCatalogStore, MemoryCache>::new());
    }
}

fn alice_links() -> Vec<ReferralLink> {
    ["alice1", "alice2"]
        .iter()
        .enumerate()
        .map(|(i, code)| ReferralLink {
            id: i as i64 + 1,
            code: code.to_string(),
            user_id: 2,
            ambassador_email: "alice@example.com".into(),
        })
        .collect()
}

fn invalidator(cache: &MemoryCache) -> CacheInvalidator {
    CacheInvalidationWorker::start(cache.clone(), Duration::ZERO).0
}

fn product_body(title: &str, price: f64) -> serde_json::Value {
    json!({
        "title": title,
        "description": format!("{title} description"),
        "image": "https://example.com/p.png",
        "price": price,
    })
}

#[actix_web::test]
async fn ambassadors_with_revenue() {
    let cache = MemoryCache::new();
    let mut store = MockAmbassadorStore::new();
    store.expect_fetch_ambassadors().times(1).returning(|| Ok(vec![alice(), bob()]));
    store.expect_fetch_completed_ambassador_orders().times(1).returning(|| Ok(vec![completed_order()]));
    let req = TestRequest::get().uri("/admin/ambassadors");
    let (status, body) = send_request(req, configure_ambassadors(AmbassadorApi::new(store, cache.clone()))).await;
    assert_eq!(status, StatusCode::OK);
    let ambassadors = parse_json(&body);
    let ambassadors = ambassadors.as_array().expect("an array");
    assert_eq!(ambassadors.len(), 2);
    assert_eq!(ambassadors[0]["email"], "alice@example.com");
    assert!((ambassadors[0]["revenue"].as_f64().unwrap() - 6.1).abs() < 1e-9);
    assert_eq!(ambassadors[1]["email"], "bob@example.com");
    assert_eq!(ambassadors[1]["revenue"].as_f64().unwrap(), 0.0);

    // The second request is served from the snapshot, without touching the database
    let req = TestRequest::get().uri("/admin/ambassadors");
    let (status, cached) =
        send_request(req, configure_ambassadors(AmbassadorApi::new(MockAmbassadorStore::new(), cache))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse_json(&cached), parse_json(&body));
}

#[actix_web::test]
async fn ambassadors_database_failure() {
    let mut store = MockAmbassadorStore::new();
    store
        .expect_fetch_ambassadors()
        .returning(|| Err(AmbassadorManagementError::DatabaseError("database is locked".into())));
    let req = TestRequest::get().uri("/admin/ambassadors");
    let (status, body) = send_request(req, configure_ambassadors(AmbassadorApi::new(store, MemoryCache::new()))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(parse_json(&body)["error"].as_str().unwrap().contains("database is locked"));
}

#[actix_web::test]
async fn rankings_are_highest_first() {
    let cache = MemoryCache::new();
    cache.incr_score(RANKINGS_KEY, "Bob Builder", 2.0).await.unwrap();
    cache.incr_score(RANKINGS_KEY, "Alice Ambassador", 6.1).await.unwrap();
    let req = TestRequest::get().uri("/ambassador/rankings");
    let (status, body) =
        send_request(req, configure_ambassadors(AmbassadorApi::new(MockAmbassadorStore::new(), cache))).await;
    assert_eq!(status, StatusCode::OK);
    let rankings = parse_json(&body);
    assert_eq!(rankings[0]["name"], "Alice Ambassador");
    assert_eq!(rankings[1]["name"], "Bob Builder");
    assert_eq!(rankings.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn create_product() {
    let cache = MemoryCache::new();
    let mut store = MockCatalogStore::new();
    store
        .expect_insert_product()
        .withf(|p| p.title == "Sticker" && p.price == 2.5)
        .times(1)
        .returning(|p| Ok(product(4, &p.title, p.price)));
    let api = CatalogApi::new(store, cache.clone(), invalidator(&cache));
    let req = TestRequest::post().uri("/admin/products").set_json(product_body("Sticker", 2.5));
    let (status, body) = send_request(req, configure_catalog(api)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(parse_json(&body)["id"], 4);
}

#[actix_web::test]
async fn create_product_with_invalid_price() {
    let cache = MemoryCache::new();
    let api = CatalogApi::new(MockCatalogStore::new(), cache.clone(), invalidator(&cache));
    let req = TestRequest::post().uri("/admin/products").set_json(product_body("Sticker", 0.0));
    let (status, _) = send_request(req, configure_catalog(api)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn update_missing_product() {
    let cache = MemoryCache::new();
    let mut store = MockCatalogStore::new();
    store.expect_update_product().times(1).returning(|id, _| Err(CatalogManagementError::ProductNotFound(id)));
    let api = CatalogApi::new(store, cache.clone(), invalidator(&cache));
    let req = TestRequest::put().uri("/admin/products/99").set_json(product_body("Sticker", 2.5));
    let (status, _) = send_request(req, configure_catalog(api)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn delete_product() {
    let cache = MemoryCache::new();
    let mut store = MockCatalogStore::new();
    store.expect_delete_product().withf(|id| *id == 3).times(1).returning(|_| Ok(()));
    let api = CatalogApi::new(store, cache.clone(), invalidator(&cache));
    let req = TestRequest::delete().uri("/admin/products/3");
    let (status, body) = send_request(req, configure_catalog(api)).await;
    assert_eq!(status, StatusCode::OK);
    let response = parse_json(&body);
    assert_eq!(response["success"], true);
    assert_eq!(response["message"], "Product 3 deleted");
}

#[actix_web::test]
async fn frontend_products_are_cached() {
    let cache = MemoryCache::new();
    let mut store = MockCatalogStore::new();
    store.expect_fetch_products().times(1).returning(|| Ok(vec![product(1, "Coffee Mug", 10.0)]));
    let api = CatalogApi::new(store, cache.clone(), invalidator(&cache));
    let req = TestRequest::get().uri("/ambassador/products/frontend");
    let (status, body) = send_request(req, configure_catalog(api)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse_json(&body)[0]["title"], "Coffee Mug");

    let api = CatalogApi::new(MockCatalogStore::new(), cache.clone(), invalidator(&cache));
    let req = TestRequest::get().uri("/ambassador/products/frontend");
    let (status, cached) = send_request(req, configure_catalog(api)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cached, body);
}

#[actix_web::test]
async fn user_links_with_their_orders() {
    let mut store = MockAmbassadorStore::new();
    store.expect_fetch_links_for_user().withf(|id| *id == 2).times(1).returning(|_| Ok(alice_links()));
    store.expect_fetch_completed_orders_for_user().times(1).returning(|_| Ok(vec![completed_order()]));
    let req = TestRequest::get().uri("/admin/users/2/links");
    let (status, body) = send_request(req, configure_ambassadors(AmbassadorApi::new(store, MemoryCache::new()))).await;
    assert_eq!(status, StatusCode::OK);
    let links = parse_json(&body);
    assert_eq!(links[0]["code"], "alice1");
    assert_eq!(links[0]["orders"][0]["id"], 12);
    assert_eq!(links[0]["orders"][0]["order_items"].as_array().unwrap().len(), 2);
    assert_eq!(links[1]["code"], "alice2");
    assert!(links[1]["orders"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn user_without_links() {
    let mut store = MockAmbassadorStore::new();
    store.expect_fetch_links_for_user().times(1).returning(|_| Ok(vec![]));
    store.expect_fetch_completed_orders_for_user().never();
    let req = TestRequest::get().uri("/admin/users/7/links");
    let (status, body) = send_request(req, configure_ambassadors(AmbassadorApi::new(store, MemoryCache::new()))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse_json(&body), json!([]));
}

#[actix_web::test]
async fn ambassador_sees_their_revenue() {
    let mut store = MockAmbassadorStore::new();
    store.expect_fetch_ambassador().withf(|id| *id == 2).times(1).returning(|_| Ok(Some(alice())));
    store.expect_fetch_completed_orders_for_user().times(1).returning(|_| Ok(vec![completed_order()]));
    let req = TestRequest::get().uri("/ambassador/user").insert_header((USER_ID_HEADER, "2"));
    let (status, body) = send_request(req, configure_ambassadors(AmbassadorApi::new(store, MemoryCache::new()))).await;
    assert_eq!(status, StatusCode::OK);
    let profile = parse_json(&body);
    assert_eq!(profile["email"], "alice@example.com");
    assert!((profile["revenue"].as_f64().unwrap() - 6.1).abs() < 1e-9);
}

#[actix_web::test]
async fn ambassador_profile_needs_an_ambassador() {
    let mut store = MockAmbassadorStore::new();
    store.expect_fetch_ambassador().times(1).returning(|_| Ok(None));
    store.expect_fetch_completed_orders_for_user().never();
    let req = TestRequest::get().uri("/ambassador/user").insert_header((USER_ID_HEADER, "1"));
    let (status, body) = send_request(req, configure_ambassadors(AmbassadorApi::new(store, MemoryCache::new()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(parse_json(&body)["error"].as_str().unwrap().contains("not an ambassador"));

    let req = TestRequest::get().uri("/ambassador/user");
    let (status, _) =
        send_request(req, configure_ambassadors(AmbassadorApi::new(MockAmbassadorStore::new(), MemoryCache::new())))
            .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn stats_per_link() {
    let mut store = MockAmbassadorStore::new();
    store.expect_fetch_links_for_user().times(1).returning(|_| Ok(alice_links()));
    store.expect_fetch_completed_orders_for_user().times(1).returning(|_| Ok(vec![completed_order()]));
    let req = TestRequest::get().uri("/ambassador/stats").insert_header((USER_ID_HEADER, "2"));
    let (status, body) = send_request(req, configure_ambassadors(AmbassadorApi::new(store, MemoryCache::new()))).await;
    assert_eq!(status, StatusCode::OK);
    let stats = parse_json(&body);
    assert_eq!(stats[0]["code"], "alice1");
    assert_eq!(stats[0]["count"], 1);
    assert!((stats[0]["revenue"].as_f64().unwrap() - 61.0).abs() < 1e-9);
    assert_eq!(stats[1]["count"], 0);
}

#[actix_web::test]
async fn backend_products_are_searched_and_paged() {
    let cache = MemoryCache::new();
    let mut store = MockCatalogStore::new();
    store.expect_fetch_products().times(1).returning(|| {
        Ok((1..=12).map(|i| product(i, &format!("Mug {i}"), i as f64)).chain([product(13, "T-Shirt", 25.5)]).collect())
    });
    let api = CatalogApi::new(store, cache.clone(), invalidator(&cache));
    let req = TestRequest::get().uri("/ambassador/products/backend?s=mug&sort=desc&page=2");
    let (status, body) = send_request(req, configure_catalog(api)).await;
    assert_eq!(status, StatusCode::OK);
    let page = parse_json(&body);
    assert_eq!(page["meta"], json!({ "total": 12, "page": 2, "last_page": 2 }));
    let ids = page["data"].as_array().unwrap().iter().map(|p| p["id"].as_i64().unwrap()).collect::<Vec<_>>();
    assert_eq!(ids, vec![3, 2, 1]);

    // Later queries filter the cached catalog
    let api = CatalogApi::new(MockCatalogStore::new(), cache.clone(), invalidator(&cache));
    let req = TestRequest::get().uri("/ambassador/products/backend");
    let (status, body) = send_request(req, configure_catalog(api)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse_json(&body)["meta"], json!({ "total": 13, "page": 1, "last_page": 2 }));
}
