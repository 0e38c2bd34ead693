use sqlx::SqliteConnection;

use crate::{
    db_types::{NewProduct, Product},
    traits::CatalogManagementError,
};

pub async fn fetch_product(product_id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    let product =
        sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(product_id).fetch_optional(conn).await?;
    Ok(product)
}

pub async fn fetch_products(conn: &mut SqliteConnection) -> Result<Vec<Product>, sqlx::Error> {
    let products = sqlx::query_as("SELECT * FROM products ORDER BY id").fetch_all(conn).await?;
    Ok(products)
}

pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, sqlx::Error> {
    let product = sqlx::query_as(
        r#"
            INSERT INTO products (title, description, image, price)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(product.title)
    .bind(product.description)
    .bind(product.image)
    .bind(product.price)
    .fetch_one(conn)
    .await?;
    Ok(product)
}

pub async fn update_product(
    product_id: i64,
    product: NewProduct,
    conn: &mut SqliteConnection,
) -> Result<Product, CatalogManagementError> {
    let product: Option<Product> = sqlx::query_as(
        r#"
            UPDATE products SET title = $1, description = $2, image = $3, price = $4
            WHERE id = $5
            RETURNING *;
        "#,
    )
    .bind(product.title)
    .bind(product.description)
    .bind(product.image)
    .bind(product.price)
    .bind(product_id)
    .fetch_optional(conn)
    .await?;
    product.ok_or(CatalogManagementError::ProductNotFound(product_id))
}

pub async fn delete_product(product_id: i64, conn: &mut SqliteConnection) -> Result<(), CatalogManagementError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1").bind(product_id).execute(conn).await?;
    if result.rows_affected() == 0 {
        return Err(CatalogManagementError::ProductNotFound(product_id));
    }
    Ok(())
}
