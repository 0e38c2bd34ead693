use std::fmt::Debug;

use log::*;

use crate::{
    amb_api::{
        catalog_objects::{select_products, ProductPage, ProductQuery},
        errors::CatalogApiError,
    },
    cache::{CacheInvalidator, KeyValueCache, PRODUCTS_BACKEND_KEY, PRODUCTS_FRONTEND_KEY, SNAPSHOT_TTL},
    db_types::{NewProduct, Product},
    traits::CatalogManagement,
};

pub fn validate_product(product: &NewProduct) -> Result<(), CatalogApiError> {
    if product.title.trim().is_empty() {
        return Err(CatalogApiError::InvalidProduct("title is required".into()));
    }
    if product.description.trim().is_empty() {
        return Err(CatalogApiError::InvalidProduct("description is required".into()));
    }
    if product.image.trim().is_empty() {
        return Err(CatalogApiError::InvalidProduct("image is required".into()));
    }
    if !(product.price.is_finite() && product.price > 0.0) {
        return Err(CatalogApiError::InvalidProduct(format!("price must be positive, not {}", product.price)));
    }
    Ok(())
}

/// Product catalog maintenance and the cached product listings.
///
/// Both listings are cache-aside snapshots of the whole catalog. The storefront listing is served as is; the
/// ambassador listing is searched, sorted and paged on every request from its own snapshot.
pub struct CatalogApi<B, C> {
    db: B,
    cache: C,
    invalidator: CacheInvalidator,
}

impl<B, C> Debug for CatalogApi<B, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B, C> CatalogApi<B, C> {
    pub fn new(db: B, cache: C, invalidator: CacheInvalidator) -> Self {
        Self { db, cache, invalidator }
    }
}

impl<B, C> CatalogApi<B, C>
where
    B: CatalogManagement,
    C: KeyValueCache,
{
    fn invalidate_listings(&self) {
        self.invalidator.clear_cache([PRODUCTS_FRONTEND_KEY, PRODUCTS_BACKEND_KEY]);
    }

    pub async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogApiError> {
        validate_product(&product)?;
        let product = self.db.insert_product(product).await?;
        info!("🛍️ Product #{} '{}' created", product.id, product.title);
        self.invalidate_listings();
        Ok(product)
    }

    pub async fn update_product(&self, product_id: i64, product: NewProduct) -> Result<Product, CatalogApiError> {
        validate_product(&product)?;
        let product = self.db.update_product(product_id, product).await?;
        info!("🛍️ Product #{product_id} updated");
        self.invalidate_listings();
        Ok(product)
    }

    pub async fn delete_product(&self, product_id: i64) -> Result<(), CatalogApiError> {
        self.db.delete_product(product_id).await?;
        info!("🛍️ Product #{product_id} deleted");
        self.invalidate_listings();
        Ok(())
    }

    /// All products, served from the cache when a fresh snapshot exists.
    pub async fn products_frontend(&self) -> Result<Vec<Product>, CatalogApiError> {
        self.cached_products(PRODUCTS_FRONTEND_KEY).await
    }

    /// One page of the searchable product listing shown to ambassadors.
    pub async fn products_backend(&self, query: &ProductQuery) -> Result<ProductPage, CatalogApiError> {
        let products = self.cached_products(PRODUCTS_BACKEND_KEY).await?;
        Ok(select_products(products, query))
    }

    async fn cached_products(&self, key: &str) -> Result<Vec<Product>, CatalogApiError> {
        match self.cache.get(key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<Product>>(&bytes) {
                Ok(products) => return Ok(products),
                Err(e) => warn!("🧹️ Cached product listing '{key}' is corrupt. Rebuilding it. {e}"),
            },
            Ok(None) => trace!("🧹️ Product listing '{key}' cache miss"),
            Err(e) => warn!("🧹️ Could not read the product listing '{key}'. Rebuilding it. {e}"),
        }
        let products = self.db.fetch_products().await?;
        match serde_json::to_vec(&products) {
            Ok(bytes) => {
                if let Err(e) = self.cache.set(key, bytes, SNAPSHOT_TTL).await {
                    warn!("🧹️ Could not store the product listing '{key}'. {e}");
                }
            },
            Err(e) => warn!("🧹️ Could not serialize the product listing. {e}"),
        }
        Ok(products)
    }
}
