use serde::{Deserialize, Serialize};

use crate::db_types::{OrderWithItems, User};

/// Published once an order has been marked complete for the first time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCompletedEvent {
    pub order: OrderWithItems,
    /// The referring ambassador
    pub ambassador: User,
    pub ambassador_revenue: f64,
    pub admin_revenue: f64,
}

impl OrderCompletedEvent {
    pub fn new(order: OrderWithItems, ambassador: User) -> Self {
        let ambassador_revenue = order.ambassador_revenue();
        let admin_revenue = order.admin_revenue();
        Self { order, ambassador, ambassador_revenue, admin_revenue }
    }

    /// The total value of the order, Σ price × quantity.
    pub fn total(&self) -> f64 {
        self.order.total()
    }
}
