use thiserror::Error;

use crate::{
    db_types::{NewOrder, NewOrderItem, Order, OrderItem, OrderWithItems, Product, ReferralLink},
    traits::UserManagement,
};

#[derive(Debug, Clone, Error)]
pub enum SettlementDatabaseError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Order {0} does not exist")]
    OrderNotFound(i64),
    #[error("Order {0} already has a transaction id")]
    TransactionIdAlreadySet(i64),
}

impl From<sqlx::Error> for SettlementDatabaseError {
    fn from(e: sqlx::Error) -> Self {
        SettlementDatabaseError::DatabaseError(e.to_string())
    }
}

/// A unit of work that stages a new order and its items.
///
/// Nothing written through the transaction is visible to anyone else until [`OrderTransaction::commit`] succeeds.
/// Dropping the transaction without committing discards every staged write, exactly like
/// [`OrderTransaction::rollback`].
#[allow(async_fn_in_trait)]
pub trait OrderTransaction {
    /// Inserts a new, incomplete order without a transaction id.
    async fn insert_order(&mut self, order: NewOrder) -> Result<Order, SettlementDatabaseError>;

    /// Reads the current catalog entry for `product_id`, as seen by this transaction.
    async fn fetch_product(&mut self, product_id: i64) -> Result<Option<Product>, SettlementDatabaseError>;

    async fn insert_order_item(&mut self, item: NewOrderItem) -> Result<OrderItem, SettlementDatabaseError>;

    /// Sets the payment provider's session id on the order. The id can only be assigned once.
    async fn assign_transaction_id(&mut self, order_id: i64, transaction_id: &str) -> Result<(), SettlementDatabaseError>;

    async fn commit(self) -> Result<(), SettlementDatabaseError>;

    async fn rollback(self) -> Result<(), SettlementDatabaseError>;
}

/// This trait defines the highest level of behaviour for backends supporting the settlement engine.
///
/// This behaviour includes:
/// * Resolving referral links
/// * Staging new orders atomically
/// * Marking orders complete, exactly once
/// * Listing orders for the administrator views
#[allow(async_fn_in_trait)]
pub trait SettlementDatabase: Clone + UserManagement {
    type Transaction: OrderTransaction;

    /// The URL of the database
    fn url(&self) -> &str;

    /// Opens a new transaction for staging an order.
    async fn begin_order_transaction(&self) -> Result<Self::Transaction, SettlementDatabaseError>;

    /// Resolves a referral code to the link and the ambassador that owns it.
    async fn fetch_link_by_code(&self, code: &str) -> Result<Option<ReferralLink>, SettlementDatabaseError>;

    /// The products promoted by the referral link with id `link_id`.
    async fn fetch_link_products(&self, link_id: i64) -> Result<Vec<Product>, SettlementDatabaseError>;

    /// Fetches the order, along with its items, that the payment provider knows by `transaction_id`.
    async fn fetch_order_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<OrderWithItems>, SettlementDatabaseError>;

    /// Marks the order as complete. The update is guarded, so it only ever happens once: the return value is `true`
    /// if this call completed the order, and `false` if it was already complete.
    async fn mark_order_complete(&self, order_id: i64) -> Result<bool, SettlementDatabaseError>;

    /// Fetches every order, with its items, oldest first.
    async fn fetch_orders_with_items(&self) -> Result<Vec<OrderWithItems>, SettlementDatabaseError>;

    /// Closes the database connection pool.
    async fn close(&mut self) -> Result<(), SettlementDatabaseError> {
        Ok(())
    }
}
