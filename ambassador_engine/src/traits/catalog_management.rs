use thiserror::Error;

use crate::db_types::{NewProduct, Product};

#[derive(Debug, Clone, Error)]
pub enum CatalogManagementError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Product {0} does not exist")]
    ProductNotFound(i64),
}

impl From<sqlx::Error> for CatalogManagementError {
    fn from(e: sqlx::Error) -> Self {
        CatalogManagementError::DatabaseError(e.to_string())
    }
}

#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogManagementError>;

    async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogManagementError>;

    /// Replaces the product's fields. Returns [`CatalogManagementError::ProductNotFound`] if there is no such product.
    async fn update_product(&self, product_id: i64, product: NewProduct) -> Result<Product, CatalogManagementError>;

    async fn delete_product(&self, product_id: i64) -> Result<(), CatalogManagementError>;
}
