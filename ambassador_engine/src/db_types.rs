//! Data types that are stored in, and read from, the relational store.
//!
//! `New*` structs are insert payloads. The remaining structs map one-to-one onto table rows.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

//--------------------------------------        User         ---------------------------------------------------------
/// A registered user. Ambassadors (referrers) and administrators share this record; `is_ambassador` is the only thing
/// that distinguishes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub is_ambassador: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The display name used as the leaderboard member.
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_ambassador: bool,
}

impl NewUser {
    pub fn new<S: Into<String>>(first_name: S, last_name: S, email: S, is_ambassador: bool) -> Self {
        Self { first_name: first_name.into(), last_name: last_name.into(), email: email.into(), is_ambassador }
    }
}

/// The user-editable profile fields. Only the fields that are `Some` are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfoUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl UserInfoUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

//--------------------------------------       Product       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub image: String,
    pub price: f64,
}

//--------------------------------------    ReferralLink     ---------------------------------------------------------
/// A referral link, joined with the email address of the ambassador that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ReferralLink {
    pub id: i64,
    pub code: String,
    pub user_id: i64,
    pub ambassador_email: String,
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub code: String,
    pub user_id: i64,
    pub ambassador_email: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub country: String,
    pub city: String,
    pub zip: String,
    pub transaction_id: Option<String>,
    pub complete: bool,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Insert payload for an order. New orders are never complete and never carry a transaction id; the id is assigned
/// once the payment session exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub code: String,
    pub user_id: i64,
    pub ambassador_email: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub country: String,
    pub city: String,
    pub zip: String,
}

//--------------------------------------      OrderItem      ---------------------------------------------------------
/// A line of an order. Title and price are a snapshot of the catalog at the time the order was placed, and the
/// revenue split is computed once and stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_title: String,
    pub price: f64,
    pub quantity: i64,
    pub ambassador_revenue: f64,
    pub admin_revenue: f64,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub order_id: i64,
    pub product_title: String,
    pub price: f64,
    pub quantity: i64,
    pub ambassador_revenue: f64,
    pub admin_revenue: f64,
}

//--------------------------------------   OrderWithItems    ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub order_items: Vec<OrderItem>,
}

impl OrderWithItems {
    pub fn new(order: Order, order_items: Vec<OrderItem>) -> Self {
        Self { order, order_items }
    }

    /// The order total, Σ price × quantity.
    pub fn total(&self) -> f64 {
        self.order_items.iter().map(OrderItem::line_total).sum()
    }

    pub fn ambassador_revenue(&self) -> f64 {
        self.order_items.iter().map(|i| i.ambassador_revenue).sum()
    }

    pub fn admin_revenue(&self) -> f64 {
        self.order_items.iter().map(|i| i.admin_revenue).sum()
    }
}
