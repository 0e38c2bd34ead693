use std::collections::HashMap;

use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    amb_api::order_objects::OrderQueryFilter,
    db_types::{NewOrder, NewOrderItem, Order, OrderItem, OrderWithItems},
    traits::SettlementDatabaseError,
};

/// Inserts a new order using the given connection. This is not atomic. Embed the call in a transaction, passing
/// `&mut *tx` as the connection, when the order must only become visible together with its items.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                code,
                user_id,
                ambassador_email,
                first_name,
                last_name,
                email,
                address,
                country,
                city,
                zip
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *;
        "#,
    )
    .bind(order.code)
    .bind(order.user_id)
    .bind(order.ambassador_email)
    .bind(order.first_name)
    .bind(order.last_name)
    .bind(order.email)
    .bind(order.address)
    .bind(order.country)
    .bind(order.city)
    .bind(order.zip)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Order #{} staged for referral code '{}'", order.id, order.code);
    Ok(order)
}

pub async fn insert_order_item(item: NewOrderItem, conn: &mut SqliteConnection) -> Result<OrderItem, sqlx::Error> {
    let item = sqlx::query_as(
        r#"
            INSERT INTO order_items (order_id, product_title, price, quantity, ambassador_revenue, admin_revenue)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(item.order_id)
    .bind(item.product_title)
    .bind(item.price)
    .bind(item.quantity)
    .bind(item.ambassador_revenue)
    .bind(item.admin_revenue)
    .fetch_one(conn)
    .await?;
    Ok(item)
}

/// Sets the transaction id of an order that does not have one yet.
pub async fn assign_transaction_id(
    order_id: i64,
    transaction_id: &str,
    conn: &mut SqliteConnection,
) -> Result<(), SettlementDatabaseError> {
    let result = sqlx::query("UPDATE orders SET transaction_id = $1 WHERE id = $2 AND transaction_id IS NULL")
        .bind(transaction_id)
        .bind(order_id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM orders WHERE id = $1").bind(order_id).fetch_optional(conn).await?;
        return match exists {
            Some(_) => Err(SettlementDatabaseError::TransactionIdAlreadySet(order_id)),
            None => Err(SettlementDatabaseError::OrderNotFound(order_id)),
        };
    }
    trace!("🗃️ Order #{order_id} has been assigned transaction id {transaction_id}");
    Ok(())
}

/// Marks the order as complete, if it is not complete already. Returns `true` if this call made the change.
pub async fn mark_order_complete(order_id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE orders SET complete = 1 WHERE id = $1 AND complete = 0")
        .bind(order_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Fetches orders according to criteria specified in the `OrderQueryFilter`
///
/// Resulting orders are ordered by `created_at`, then `id`, in ascending order
pub async fn search_orders(query: OrderQueryFilter, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM orders ");
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(transaction_id) = query.transaction_id {
        where_clause.push("transaction_id = ");
        where_clause.push_bind_unseparated(transaction_id);
    }
    if let Some(user_id) = query.user_id {
        where_clause.push("user_id = ");
        where_clause.push_bind_unseparated(user_id);
    }
    if let Some(complete) = query.complete {
        where_clause.push("complete = ");
        where_clause.push_bind_unseparated(complete);
    }
    if query.ambassadors_only {
        where_clause.push("user_id IN (SELECT id FROM users WHERE is_ambassador = 1)");
    }
    builder.push(" ORDER BY created_at ASC, id ASC");

    trace!("🗃️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<Order>().fetch_all(conn).await?;
    trace!("🗃️ Result of search_orders: {}", orders.len());
    Ok(orders)
}

/// Fetches the items for every order in `orders` with a single query and attaches them to their orders.
pub async fn attach_items(
    orders: Vec<Order>,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderWithItems>, sqlx::Error> {
    if orders.is_empty() {
        return Ok(vec![]);
    }
    let mut builder = QueryBuilder::new("SELECT * FROM order_items WHERE order_id IN (");
    let mut ids = builder.separated(", ");
    for order in &orders {
        ids.push_bind(order.id);
    }
    builder.push(") ORDER BY id ASC");
    let items = builder.build_query_as::<OrderItem>().fetch_all(conn).await?;
    let mut items_by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for item in items {
        items_by_order.entry(item.order_id).or_default().push(item);
    }
    let result = orders
        .into_iter()
        .map(|order| {
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            OrderWithItems::new(order, items)
        })
        .collect();
    Ok(result)
}

pub async fn search_orders_with_items(
    query: OrderQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderWithItems>, sqlx::Error> {
    let orders = search_orders(query, &mut *conn).await?;
    attach_items(orders, conn).await
}
