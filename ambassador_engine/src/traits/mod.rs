//! # Database management and control.
//!
//! This module defines the contracts that relational *backends* must fulfil in order to drive the settlement engine.
//!
//! * [`SettlementDatabase`] is the highest level of behaviour: resolving referral links, staging new orders in an
//!   atomic [`OrderTransaction`], and completing orders.
//! * [`UserManagement`] covers registration and profile updates for ambassadors and administrators.
//! * [`AmbassadorManagement`] provides the read queries that feed the ambassador revenue aggregation.
//! * [`CatalogManagement`] provides the product catalog writes and reads.
//!
//! The payment-session collaborator is also described here, by [`PaymentSessionProvider`].
mod ambassador_management;
mod catalog_management;
mod payment_session;
mod settlement_database;
mod user_management;

pub use ambassador_management::{AmbassadorManagement, AmbassadorManagementError};
pub use catalog_management::{CatalogManagement, CatalogManagementError};
pub use payment_session::PaymentSessionProvider;
pub use settlement_database::{OrderTransaction, SettlementDatabase, SettlementDatabaseError};
pub use user_management::{UserManagement, UserManagementError};
