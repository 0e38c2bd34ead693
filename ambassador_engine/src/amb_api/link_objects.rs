use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::db_types::{OrderWithItems, Product, ReferralLink};

/// A referral link with the products it promotes. This is what the storefront renders before checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkDetails {
    #[serde(flatten)]
    pub link: ReferralLink,
    pub products: Vec<Product>,
}

/// A referral link with the completed orders placed through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkWithOrders {
    #[serde(flatten)]
    pub link: ReferralLink,
    pub orders: Vec<OrderWithItems>,
}

/// Sales through a single referral link. `revenue` is the sum of the order totals, not the ambassador's share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkStats {
    pub code: String,
    pub count: usize,
    pub revenue: f64,
}

impl From<&LinkWithOrders> for LinkStats {
    fn from(link: &LinkWithOrders) -> Self {
        Self {
            code: link.link.code.clone(),
            count: link.orders.len(),
            revenue: link.orders.iter().map(OrderWithItems::total).sum(),
        }
    }
}

/// Attaches each order to the link whose code it was placed through. Links keep their order, and orders for codes
/// not in `links` are dropped.
pub fn group_orders_by_link(links: Vec<ReferralLink>, orders: Vec<OrderWithItems>) -> Vec<LinkWithOrders> {
    let mut by_code: HashMap<String, Vec<OrderWithItems>> = HashMap::new();
    for order in orders {
        by_code.entry(order.order.code.clone()).or_default().push(order);
    }
    links
        .into_iter()
        .map(|link| {
            let orders = by_code.remove(&link.code).unwrap_or_default();
            LinkWithOrders { link, orders }
        })
        .collect()
}
