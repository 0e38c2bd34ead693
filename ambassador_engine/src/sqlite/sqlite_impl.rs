//! `SqliteDatabase` is the concrete SQLite backend of the settlement engine.
//!
//! It implements all the traits defined in the [`crate::traits`] module.
use std::{fmt::Debug, time::Duration};

use log::*;
use sqlx::{migrate, migrate::MigrateError, Sqlite, SqlitePool, Transaction};

use super::db::{links, new_pool, orders, products, users, DEFAULT_BUSY_TIMEOUT};
use crate::{
    amb_api::order_objects::OrderQueryFilter,
    db_types::{
        NewOrder,
        NewOrderItem,
        NewProduct,
        NewUser,
        Order,
        OrderItem,
        OrderWithItems,
        Product,
        ReferralLink,
        User,
        UserInfoUpdate,
    },
    traits::{
        AmbassadorManagement,
        AmbassadorManagementError,
        CatalogManagement,
        CatalogManagementError,
        OrderTransaction,
        SettlementDatabase,
        SettlementDatabaseError,
        UserManagement,
        UserManagementError,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        SqliteDatabase::new_with_busy_timeout(url, max_connections, DEFAULT_BUSY_TIMEOUT).await
    }

    /// Like [`Self::new_with_url`], but writers wait up to `busy_timeout` for a competing write transaction.
    pub async fn new_with_busy_timeout(
        url: &str,
        max_connections: u32,
        busy_timeout: Duration,
    ) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections, busy_timeout).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date with the migrations embedded in the binary.
    pub async fn run_migrations(&self) -> Result<(), MigrateError> {
        migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }
}

/// An order staged inside an open SQLite transaction. Dropping it without calling `commit` rolls everything back.
pub struct SqliteOrderTransaction {
    tx: Transaction<'static, Sqlite>,
}

impl OrderTransaction for SqliteOrderTransaction {
    async fn insert_order(&mut self, order: NewOrder) -> Result<Order, SettlementDatabaseError> {
        let order = orders::insert_order(order, &mut self.tx).await?;
        Ok(order)
    }

    async fn fetch_product(&mut self, product_id: i64) -> Result<Option<Product>, SettlementDatabaseError> {
        let product = products::fetch_product(product_id, &mut self.tx).await?;
        Ok(product)
    }

    async fn insert_order_item(&mut self, item: NewOrderItem) -> Result<OrderItem, SettlementDatabaseError> {
        let item = orders::insert_order_item(item, &mut self.tx).await?;
        Ok(item)
    }

    async fn assign_transaction_id(&mut self, order_id: i64, transaction_id: &str) -> Result<(), SettlementDatabaseError> {
        orders::assign_transaction_id(order_id, transaction_id, &mut self.tx).await
    }

    async fn commit(self) -> Result<(), SettlementDatabaseError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), SettlementDatabaseError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

impl SettlementDatabase for SqliteDatabase {
    type Transaction = SqliteOrderTransaction;

    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn begin_order_transaction(&self) -> Result<Self::Transaction, SettlementDatabaseError> {
        let tx = self.pool.begin().await?;
        Ok(SqliteOrderTransaction { tx })
    }

    async fn fetch_link_by_code(&self, code: &str) -> Result<Option<ReferralLink>, SettlementDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let link = links::fetch_link_by_code(code, &mut conn).await?;
        Ok(link)
    }

    async fn fetch_link_products(&self, link_id: i64) -> Result<Vec<Product>, SettlementDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let products = links::fetch_link_products(link_id, &mut conn).await?;
        Ok(products)
    }

    async fn fetch_order_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<OrderWithItems>, SettlementDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let query = OrderQueryFilter::default().with_transaction_id(transaction_id);
        let order = orders::search_orders_with_items(query, &mut conn).await?.into_iter().next();
        Ok(order)
    }

    async fn mark_order_complete(&self, order_id: i64) -> Result<bool, SettlementDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let updated = orders::mark_order_complete(order_id, &mut conn).await?;
        if updated {
            debug!("🗃️ Order #{order_id} marked as complete");
        } else {
            debug!("🗃️ Order #{order_id} was already complete");
        }
        Ok(updated)
    }

    async fn fetch_orders_with_items(&self) -> Result<Vec<OrderWithItems>, SettlementDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::search_orders_with_items(OrderQueryFilter::default(), &mut conn).await?;
        Ok(orders)
    }

    async fn close(&mut self) -> Result<(), SettlementDatabaseError> {
        self.pool.close().await;
        Ok(())
    }
}

impl UserManagement for SqliteDatabase {
    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, UserManagementError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::fetch_user(user_id, &mut conn).await?;
        Ok(user)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, UserManagementError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::insert_user(user, &mut conn).await?;
        debug!("🗃️ User #{} registered ({})", user.id, user.email);
        Ok(user)
    }

    async fn update_user_info(&self, user_id: i64, update: UserInfoUpdate) -> Result<User, UserManagementError> {
        let mut conn = self.pool.acquire().await?;
        users::update_user_info(user_id, update, &mut conn).await
    }
}

impl AmbassadorManagement for SqliteDatabase {
    async fn fetch_ambassadors(&self) -> Result<Vec<User>, AmbassadorManagementError> {
        let mut conn = self.pool.acquire().await?;
        let ambassadors = users::fetch_ambassadors(&mut conn).await?;
        Ok(ambassadors)
    }

    async fn fetch_completed_ambassador_orders(&self) -> Result<Vec<OrderWithItems>, AmbassadorManagementError> {
        let mut conn = self.pool.acquire().await?;
        let query = OrderQueryFilter::default().with_complete(true).ambassadors_only();
        let orders = orders::search_orders_with_items(query, &mut conn).await?;
        Ok(orders)
    }

    async fn fetch_ambassador(&self, user_id: i64) -> Result<Option<User>, AmbassadorManagementError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::fetch_ambassador(user_id, &mut conn).await?;
        Ok(user)
    }

    async fn fetch_links_for_user(&self, user_id: i64) -> Result<Vec<ReferralLink>, AmbassadorManagementError> {
        let mut conn = self.pool.acquire().await?;
        let links = links::fetch_links_for_user(user_id, &mut conn).await?;
        Ok(links)
    }

    async fn fetch_completed_orders_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<OrderWithItems>, AmbassadorManagementError> {
        let mut conn = self.pool.acquire().await?;
        let query = OrderQueryFilter::default().with_user_id(user_id).with_complete(true);
        let orders = orders::search_orders_with_items(query, &mut conn).await?;
        Ok(orders)
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogManagementError> {
        let mut conn = self.pool.acquire().await?;
        let products = products::fetch_products(&mut conn).await?;
        Ok(products)
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogManagementError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::insert_product(product, &mut conn).await?;
        debug!("🗃️ Product #{} '{}' added to the catalog", product.id, product.title);
        Ok(product)
    }

    async fn update_product(&self, product_id: i64, product: NewProduct) -> Result<Product, CatalogManagementError> {
        let mut conn = self.pool.acquire().await?;
        products::update_product(product_id, product, &mut conn).await
    }

    async fn delete_product(&self, product_id: i64) -> Result<(), CatalogManagementError> {
        let mut conn = self.pool.acquire().await?;
        products::delete_product(product_id, &mut conn).await?;
        debug!("🗃️ Product #{product_id} removed from the catalog");
        Ok(())
    }
}
