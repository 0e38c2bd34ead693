use ambassador_engine::{
    db_types::{Order, OrderItem, OrderWithItems, Product, User},
    events::OrderCompletedEvent,
};
use chrono::{TimeZone, Utc};

pub fn alice() -> User {
    User {
        id: 2,
        first_name: "Alice".into(),
        last_name: "Ambassador".into(),
        email: "alice@example.com".into(),
        is_ambassador: true,
        created_at: Utc.with_ymd_and_hms(2024, 10, 1, 9, 0, 0).unwrap(),
    }
}

pub fn bob() -> User {
    User {
        id: 3,
        first_name: "Bob".into(),
        last_name: "Builder".into(),
        email: "bob@example.com".into(),
        is_ambassador: true,
        created_at: Utc.with_ymd_and_hms(2024, 10, 2, 9, 0, 0).unwrap(),
    }
}

fn item(id: i64, title: &str, price: f64, quantity: i64) -> OrderItem {
    let total = price * quantity as f64;
    OrderItem {
        id,
        order_id: 12,
        product_title: title.into(),
        price,
        quantity,
        ambassador_revenue: 0.1 * total,
        admin_revenue: 0.9 * total,
    }
}

/// Order #12, referred by Alice: two T-Shirts at 25.50 and a Coffee Mug at 10.00.
pub fn completed_order() -> OrderWithItems {
    let order = Order {
        id: 12,
        code: "alice1".into(),
        user_id: 2,
        ambassador_email: "alice@example.com".into(),
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        email: "jane@example.com".into(),
        address: "1 Main St".into(),
        country: "US".into(),
        city: "Springfield".into(),
        zip: "12345".into(),
        transaction_id: Some("cs_test_12".into()),
        complete: true,
        created_at: Utc.with_ymd_and_hms(2024, 10, 3, 14, 30, 0).unwrap(),
    };
    OrderWithItems::new(order, vec![item(1, "T-Shirt", 25.5, 2), item(2, "Coffee Mug", 10.0, 1)])
}

pub fn completed_event() -> OrderCompletedEvent {
    OrderCompletedEvent::new(completed_order(), alice())
}

pub fn product(id: i64, title: &str, price: f64) -> Product {
    Product {
        id,
        title: title.into(),
        description: format!("{title} description"),
        image: format!("https://example.com/{id}.png"),
        price,
    }
}
