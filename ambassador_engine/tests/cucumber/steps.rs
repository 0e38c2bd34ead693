use std::{sync::atomic::Ordering, time::Duration};

use ambassador_engine::{
    cache::{KeyValueCache, RANKINGS_KEY},
    order_objects::{CompletionResult, CreateOrderRequest, ProductQuantity},
    SettlementDatabase,
    SettlementError,
};
use cucumber::{gherkin::Step, then, when};

use crate::cucumber::SettlementWorld;

fn products_from_table(world: &SettlementWorld, step: &Step) -> Vec<ProductQuantity> {
    let table = step.table.as_ref().expect("An order needs a product table");
    table
        .rows
        .iter()
        .skip(1)
        .map(|row| {
            let id = world.system().product_id(&row[0]);
            let quantity = row[1].parse::<i64>().expect("Quantity must be an integer");
            ProductQuantity::new(id, quantity)
        })
        .collect()
}

#[when(expr = "a buyer orders through link {string}:")]
async fn buyer_orders(world: &mut SettlementWorld, code: String, step: &Step) {
    let products = products_from_table(world, step);
    let request = CreateOrderRequest {
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        email: "jane@example.com".into(),
        address: "1 Main St".into(),
        country: "US".into(),
        city: "Springfield".into(),
        zip: "12345".into(),
        code,
        products,
    };
    let result = world.system().api.create_order(request).await;
    match result {
        Ok(session) => {
            world.last_session = Some(session);
            world.last_error = None;
        },
        Err(e) => {
            world.last_session = None;
            world.last_error = Some(e);
        },
    }
}

#[when(expr = "the payment provider confirms session {string}")]
async fn provider_confirms(world: &mut SettlementWorld, source: String) {
    let result = world.system().api.complete_order(&source).await;
    match result {
        Ok(result) => {
            world.last_completion = Some(result);
            world.last_error = None;
        },
        Err(e) => {
            world.last_completion = None;
            world.last_error = Some(e);
        },
    }
}

#[when(expr = "I pause for {int}ms")]
async fn pause(_world: &mut SettlementWorld, ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[then(expr = "the checkout session is {string}")]
async fn check_session(world: &mut SettlementWorld, id: String) {
    let session = world.last_session.as_ref().expect("No checkout session was created");
    assert_eq!(session.id, id);
}

#[then(expr = "the order fails with {string}")]
async fn check_error(world: &mut SettlementWorld, kind: String) {
    let err = world.last_error.as_ref().expect("The last request did not fail");
    let actual = match err {
        SettlementError::MissingField(_) => "MissingField",
        SettlementError::EmptyOrder => "EmptyOrder",
        SettlementError::InvalidQuantity { .. } => "InvalidQuantity",
        SettlementError::InvalidLink(_) => "InvalidLink",
        SettlementError::InvalidProduct(_) => "InvalidProduct",
        SettlementError::ProviderError(_) => "ProviderError",
        SettlementError::MissingSource => "MissingSource",
        SettlementError::OrderNotFound(_) => "OrderNotFound",
        SettlementError::UserLookupFailed(_) => "UserLookupFailed",
        SettlementError::PersistenceError(_) => "PersistenceError",
    };
    assert_eq!(actual, kind, "Unexpected error: {err}");
}

#[then(expr = "the completion is {string}")]
async fn check_completion(world: &mut SettlementWorld, status: String) {
    let result = world.last_completion.as_ref().expect("No completion result");
    let actual = match result {
        CompletionResult::Completed(_) => "new",
        CompletionResult::AlreadyComplete(_) => "repeat",
    };
    assert_eq!(actual, status);
}

#[then(expr = "there are {int} orders in the database")]
async fn check_order_count(world: &mut SettlementWorld, count: usize) {
    let orders = world.system().db.fetch_orders_with_items().await.expect("Error fetching orders");
    assert_eq!(orders.len(), count);
}

#[then(expr = "order {string} is complete")]
async fn check_order_complete(world: &mut SettlementWorld, source: String) {
    let order = world.system().db.fetch_order_by_transaction_id(&source).await.expect("db error").expect("no order");
    assert!(order.order.complete, "Order {source} is not complete");
}

#[then(expr = "order {string} is pending")]
async fn check_order_pending(world: &mut SettlementWorld, source: String) {
    let order = world.system().db.fetch_order_by_transaction_id(&source).await.expect("db error").expect("no order");
    assert!(!order.order.complete, "Order {source} is already complete");
}

#[then(expr = "the leaderboard shows {string} with {float}")]
async fn check_leaderboard(world: &mut SettlementWorld, name: String, score: f64) {
    let rankings = world.system().cache.scores_desc(RANKINGS_KEY).await.expect("cache error");
    let entry = rankings.iter().find(|(n, _)| *n == name).unwrap_or_else(|| panic!("{name} is not ranked"));
    assert!((entry.1 - score).abs() < 1e-6, "{name} has score {}, expected {score}", entry.1);
}

#[then("the leaderboard is empty")]
async fn check_leaderboard_empty(world: &mut SettlementWorld) {
    let rankings = world.system().cache.scores_desc(RANKINGS_KEY).await.expect("cache error");
    assert!(rankings.is_empty(), "Leaderboard has {} entries", rankings.len());
}

#[then(expr = "ambassador {string} has earned {float}")]
async fn check_ambassador_revenue(world: &mut SettlementWorld, email: String, revenue: f64) {
    let ambassadors = world.system().ambassadors.ambassadors_with_revenue().await.expect("Error fetching ambassadors");
    let entry = ambassadors.iter().find(|a| a.user.email == email).unwrap_or_else(|| panic!("{email} not found"));
    assert!((entry.revenue - revenue).abs() < 1e-6, "{email} earned {}, expected {revenue}", entry.revenue);
}

#[then(expr = "the payment provider was called {int} times")]
async fn check_provider_calls(world: &mut SettlementWorld, count: usize) {
    assert_eq!(world.system().provider.calls.load(Ordering::SeqCst), count);
}
