use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    amb_api::errors::SettlementError,
    db_types::{NewOrder, OrderWithItems, ReferralLink},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuantity {
    pub product_id: i64,
    pub quantity: i64,
}

impl ProductQuantity {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        Self { product_id, quantity }
    }
}

/// A buyer's checkout request, placed through an ambassador's referral link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub country: String,
    pub city: String,
    pub zip: String,
    /// The referral code of the link the buyer arrived through
    pub code: String,
    pub products: Vec<ProductQuantity>,
}

impl CreateOrderRequest {
    /// Checks the request shape. Nothing is looked up in the database here.
    pub fn validate(&self) -> Result<(), SettlementError> {
        let fields = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("address", &self.address),
            ("country", &self.country),
            ("city", &self.city),
            ("zip", &self.zip),
            ("code", &self.code),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(SettlementError::MissingField(name.to_string()));
        }
        if self.products.is_empty() {
            return Err(SettlementError::EmptyOrder);
        }
        if let Some(p) = self.products.iter().find(|p| p.quantity < 1 || u32::try_from(p.quantity).is_err()) {
            return Err(SettlementError::InvalidQuantity { product_id: p.product_id, quantity: p.quantity });
        }
        Ok(())
    }

    /// Builds the order record for this request, attributing it to the owner of `link`.
    pub fn new_order(&self, link: &ReferralLink) -> NewOrder {
        NewOrder {
            code: link.code.clone(),
            user_id: link.user_id,
            ambassador_email: link.ambassador_email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            country: self.country.clone(),
            city: self.city.clone(),
            zip: self.zip.clone(),
        }
    }
}

/// The outcome of a completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "order", rename_all = "snake_case")]
pub enum CompletionResult {
    /// The order was completed by this request.
    Completed(OrderWithItems),
    /// The order had already been completed by an earlier request. Nothing was changed.
    AlreadyComplete(OrderWithItems),
}

impl CompletionResult {
    pub fn order(&self) -> &OrderWithItems {
        match self {
            CompletionResult::Completed(o) | CompletionResult::AlreadyComplete(o) => o,
        }
    }

    pub fn is_new_completion(&self) -> bool {
        matches!(self, CompletionResult::Completed(_))
    }
}

/// An order as presented in the administrator's order listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    #[serde(flatten)]
    pub order: OrderWithItems,
    /// The buyer's full name
    pub name: String,
    pub total: f64,
}

impl From<OrderWithItems> for OrderSummary {
    fn from(order: OrderWithItems) -> Self {
        let name = order.order.full_name();
        let total = order.total();
        Self { order, name, total }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQueryFilter {
    pub transaction_id: Option<String>,
    pub user_id: Option<i64>,
    pub complete: Option<bool>,
    /// Only return orders placed through links owned by ambassadors
    #[serde(default)]
    pub ambassadors_only: bool,
}

impl OrderQueryFilter {
    pub fn with_transaction_id<S: Into<String>>(mut self, transaction_id: S) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_complete(mut self, complete: bool) -> Self {
        self.complete = Some(complete);
        self
    }

    pub fn ambassadors_only(mut self) -> Self {
        self.ambassadors_only = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_id.is_none() && self.user_id.is_none() && self.complete.is_none() && !self.ambassadors_only
    }
}

impl Display for OrderQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "No filters.");
        }
        if let Some(transaction_id) = &self.transaction_id {
            write!(f, "transaction_id: {transaction_id}. ")?;
        }
        if let Some(user_id) = &self.user_id {
            write!(f, "user_id: {user_id}. ")?;
        }
        if let Some(complete) = &self.complete {
            write!(f, "complete: {complete}. ")?;
        }
        if self.ambassadors_only {
            write!(f, "ambassadors only. ")?;
        }
        Ok(())
    }
}
