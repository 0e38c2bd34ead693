use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::db_types::Product;

/// Number of products on each page of the searchable listing.
pub const PRODUCTS_PER_PAGE: usize = 9;

/// Query parameters for the searchable product listing. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Case-insensitive text matched against the title and description
    pub s: Option<String>,
    /// `asc` or `desc`, by price. Any other value leaves the catalog order alone.
    pub sort: Option<String>,
    /// 1-based. Missing or out of range pages fall back to the first page.
    pub page: Option<usize>,
}

impl ProductQuery {
    pub fn search<S: Into<String>>(mut self, s: S) -> Self {
        self.s = Some(s.into());
        self
    }

    pub fn sort<S: Into<String>>(mut self, sort: S) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: usize,
    pub page: usize,
    pub last_page: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub data: Vec<Product>,
    pub meta: PageMeta,
}

fn matches(product: &Product, needle: &str) -> bool {
    product.title.to_lowercase().contains(needle) || product.description.to_lowercase().contains(needle)
}

/// Filters, sorts and pages `products` according to `query`.
pub fn select_products(products: Vec<Product>, query: &ProductQuery) -> ProductPage {
    let needle = query.s.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_lowercase);
    let mut selected = match needle {
        Some(needle) => products.into_iter().filter(|p| matches(p, &needle)).collect::<Vec<_>>(),
        None => products,
    };
    match query.sort.as_deref().map(str::to_lowercase).as_deref() {
        Some("asc") => selected.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal)),
        Some("desc") => selected.sort_by(|a, b| b.price.partial_cmp(&a.price).unwrap_or(Ordering::Equal)),
        _ => {},
    }
    let total = selected.len();
    let last_page = total.div_ceil(PRODUCTS_PER_PAGE).max(1);
    let page = query.page.filter(|p| (1..=last_page).contains(p)).unwrap_or(1);
    let data = selected.into_iter().skip((page - 1) * PRODUCTS_PER_PAGE).take(PRODUCTS_PER_PAGE).collect();
    ProductPage { data, meta: PageMeta { total, page, last_page } }
}
