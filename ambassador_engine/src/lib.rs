//! Ambassador Engine
//!
//! The engine behind a referral store. Ambassadors share referral links; buyers check out through those links and
//! pay on a hosted payment page; once the payment provider confirms the payment, the order is settled and the
//! ambassador is credited with their share of the revenue.
//!
//! The library is divided into these sections:
//! 1. Database contracts ([`mod@traits`]) and the SQLite backend that implements them. The data types stored in the
//!    database are defined in [`mod@db_types`].
//! 2. The public API ([`mod@amb_api`]): checkout and settlement, ambassador revenue, users and the product catalog.
//! 3. The key-value cache ([`mod@cache`]) that holds derived read models and the leaderboard, along with the
//!    background worker that invalidates stale entries.
//! 4. Revenue attribution ([`mod@revenue`]).
//!
//! The engine also emits events when an order is completed. Hook into them through [`events::EventHooks`], e.g. to
//! send notification emails.
pub mod amb_api;
pub mod cache;
pub mod db_types;
pub mod events;
pub mod revenue;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use amb_api::{
    ambassador_api::{AmbassadorApi, Ranking},
    catalog_api::CatalogApi,
    catalog_objects,
    errors::{AmbassadorApiError, CatalogApiError, SettlementError, UserApiError},
    link_objects,
    order_objects,
    payment_objects,
    settlement_api::OrderSettlementApi,
    user_api::UserApi,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{
    AmbassadorManagement,
    CatalogManagement,
    OrderTransaction,
    PaymentSessionProvider,
    SettlementDatabase,
    UserManagement,
};
