//! # Ambassador engine public API
//!
//! The `amb_api` module exposes the programmatic API of the settlement engine. The API is modular, so that clients
//! can pick the functionality they need.
//!
//! * [`settlement_api`] is the primary API. It handles checkout (order creation and the payment session) and
//!   settlement (order completion, revenue attribution and the leaderboard).
//! * [`ambassador_api`] serves the cached ambassador revenue list and the leaderboard.
//! * [`user_api`] handles registration and profile updates.
//! * [`catalog_api`] maintains the product catalog and its cached listings.
//!
//! # API usage
//!
//! Every API is created by supplying a database backend that implements the backend traits the API needs, plus the
//! cache handles it uses.
//!
//! ```rust,ignore
//! use ambassador_engine::{cache::MemoryCache, AmbassadorApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let cache = MemoryCache::new();
//! let api = AmbassadorApi::new(db, cache);
//! let ambassadors = api.ambassadors_with_revenue().await?;
//! ```
pub mod ambassador_api;
pub mod catalog_api;
pub mod catalog_objects;
pub mod errors;
pub mod link_objects;
pub mod order_objects;
pub mod payment_objects;
pub mod settlement_api;
pub mod user_api;
