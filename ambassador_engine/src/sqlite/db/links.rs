use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{Product, ReferralLink};

/// Resolves a referral code, joining in the email address of the owning ambassador.
pub async fn fetch_link_by_code(code: &str, conn: &mut SqliteConnection) -> Result<Option<ReferralLink>, sqlx::Error> {
    let link = sqlx::query_as(
        r#"
            SELECT links.id, links.code, links.user_id, users.email AS ambassador_email
            FROM links JOIN users ON links.user_id = users.id
            WHERE links.code = $1
        "#,
    )
    .bind(code)
    .fetch_optional(conn)
    .await?;
    Ok(link)
}

pub async fn fetch_links_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<ReferralLink>, sqlx::Error> {
    let links = sqlx::query_as(
        r#"
            SELECT links.id, links.code, links.user_id, users.email AS ambassador_email
            FROM links JOIN users ON links.user_id = users.id
            WHERE links.user_id = $1
            ORDER BY links.id
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(links)
}

pub async fn fetch_link_products(link_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Product>, sqlx::Error> {
    let products = sqlx::query_as(
        r#"
            SELECT products.*
            FROM products JOIN link_products ON link_products.product_id = products.id
            WHERE link_products.link_id = $1
            ORDER BY products.id
        "#,
    )
    .bind(link_id)
    .fetch_all(conn)
    .await?;
    Ok(products)
}

/// Creates a referral link for `user_id` covering the given products. This is not atomic; wrap the call in a
/// transaction if a partially-written link must never be visible.
pub async fn insert_link(
    code: &str,
    user_id: i64,
    product_ids: &[i64],
    conn: &mut SqliteConnection,
) -> Result<ReferralLink, sqlx::Error> {
    let link_id: i64 = sqlx::query_scalar("INSERT INTO links (code, user_id) VALUES ($1, $2) RETURNING id")
        .bind(code)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
    for product_id in product_ids {
        sqlx::query("INSERT INTO link_products (link_id, product_id) VALUES ($1, $2)")
            .bind(link_id)
            .bind(product_id)
            .execute(&mut *conn)
            .await?;
    }
    debug!("🗃️ Referral link '{code}' created for user #{user_id} with {} products", product_ids.len());
    let link = fetch_link_by_code(code, conn).await?.ok_or(sqlx::Error::RowNotFound)?;
    Ok(link)
}
