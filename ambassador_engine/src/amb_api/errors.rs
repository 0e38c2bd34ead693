use thiserror::Error;

use crate::traits::{
    AmbassadorManagementError,
    CatalogManagementError,
    SettlementDatabaseError,
    UserManagementError,
};

/// Errors from the checkout and settlement flows.
///
/// Validation and lookup failures are reported before anything is written. Provider and persistence failures during
/// checkout roll back the staged order.
#[derive(Debug, Clone, Error)]
pub enum SettlementError {
    #[error("Required field '{0}' is missing")]
    MissingField(String),
    #[error("An order must contain at least one product")]
    EmptyOrder,
    #[error("Product {product_id} has an invalid quantity of {quantity}")]
    InvalidQuantity { product_id: i64, quantity: i64 },
    #[error("Referral link '{0}' does not exist")]
    InvalidLink(String),
    #[error("Product {0} does not exist")]
    InvalidProduct(i64),
    #[error("The payment provider could not create a checkout session: {0}")]
    ProviderError(String),
    #[error("No payment session reference was provided")]
    MissingSource,
    #[error("No order exists for payment session {0}")]
    OrderNotFound(String),
    #[error("The ambassador (user {0}) that owns the order could not be found")]
    UserLookupFailed(i64),
    #[error("Database error: {0}")]
    PersistenceError(String),
}

impl From<SettlementDatabaseError> for SettlementError {
    fn from(e: SettlementDatabaseError) -> Self {
        SettlementError::PersistenceError(e.to_string())
    }
}

impl From<UserManagementError> for SettlementError {
    fn from(e: UserManagementError) -> Self {
        SettlementError::PersistenceError(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AmbassadorApiError {
    #[error("User {0} is not an ambassador")]
    AmbassadorNotFound(i64),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Cache error: {0}")]
    CacheError(String),
}

impl From<AmbassadorManagementError> for AmbassadorApiError {
    fn from(e: AmbassadorManagementError) -> Self {
        AmbassadorApiError::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum UserApiError {
    #[error("Required field '{0}' is missing")]
    MissingField(String),
    #[error("The email address {0} is already registered")]
    EmailAlreadyRegistered(String),
    #[error("User {0} does not exist")]
    UserNotFound(i64),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<UserManagementError> for UserApiError {
    fn from(e: UserManagementError) -> Self {
        match e {
            UserManagementError::DatabaseError(s) => UserApiError::DatabaseError(s),
            UserManagementError::EmailAlreadyRegistered(email) => UserApiError::EmailAlreadyRegistered(email),
            UserManagementError::UserNotFound(id) => UserApiError::UserNotFound(id),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
    #[error("Product {0} does not exist")]
    ProductNotFound(i64),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<CatalogManagementError> for CatalogApiError {
    fn from(e: CatalogManagementError) -> Self {
        match e {
            CatalogManagementError::DatabaseError(s) => CatalogApiError::DatabaseError(s),
            CatalogManagementError::ProductNotFound(id) => CatalogApiError::ProductNotFound(id),
        }
    }
}
