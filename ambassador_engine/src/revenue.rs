//! Revenue attribution for referral orders.
//!
//! Every line item of a referred order is split between the ambassador that owns the referral link and the platform.
//! The split is computed once, when the order is created, and persisted with the order item.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::db_types::{OrderWithItems, User};

/// The fraction of each line total that is credited to the referring ambassador.
pub const AMBASSADOR_SHARE: f64 = 0.1;
/// The fraction of each line total that is kept by the platform.
pub const ADMIN_SHARE: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenueSplit {
    pub line_total: f64,
    pub ambassador_revenue: f64,
    pub admin_revenue: f64,
}

/// Splits the line total (`price` × `quantity`) into the ambassador and platform shares.
pub fn split_revenue(price: f64, quantity: u32) -> RevenueSplit {
    let line_total = price * f64::from(quantity);
    RevenueSplit {
        line_total,
        ambassador_revenue: AMBASSADOR_SHARE * line_total,
        admin_revenue: ADMIN_SHARE * line_total,
    }
}

/// An ambassador, together with the total revenue they have earned from completed orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbassadorRevenue {
    #[serde(flatten)]
    pub user: User,
    pub revenue: f64,
}

/// Sums the ambassador revenue of the given orders. Incomplete orders never contribute.
pub fn ambassador_revenue(orders: &[OrderWithItems]) -> f64 {
    orders.iter().filter(|o| o.order.complete).map(OrderWithItems::ambassador_revenue).sum()
}

/// Groups the orders by their owning ambassador and attaches the revenue total to every ambassador in `ambassadors`.
/// Ambassadors without any completed orders are reported with a revenue of zero. The order of `ambassadors` is
/// preserved.
pub fn aggregate_ambassador_revenue(ambassadors: Vec<User>, orders: Vec<OrderWithItems>) -> Vec<AmbassadorRevenue> {
    let mut by_owner: HashMap<i64, Vec<OrderWithItems>> = HashMap::new();
    for order in orders {
        by_owner.entry(order.order.user_id).or_default().push(order);
    }
    ambassadors
        .into_iter()
        .map(|user| {
            let revenue = by_owner.get(&user.id).map(|orders| ambassador_revenue(orders)).unwrap_or_default();
            AmbassadorRevenue { user, revenue }
        })
        .collect()
}
