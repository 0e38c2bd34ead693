use thiserror::Error;

use crate::db_types::{OrderWithItems, ReferralLink, User};

#[derive(Debug, Clone, Error)]
pub enum AmbassadorManagementError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for AmbassadorManagementError {
    fn from(e: sqlx::Error) -> Self {
        AmbassadorManagementError::DatabaseError(e.to_string())
    }
}

#[allow(async_fn_in_trait)]
pub trait AmbassadorManagement {
    /// All users flagged as ambassadors, in id order.
    async fn fetch_ambassadors(&self) -> Result<Vec<User>, AmbassadorManagementError>;

    /// All completed orders, with their items, that were placed through links owned by ambassadors.
    async fn fetch_completed_ambassador_orders(&self) -> Result<Vec<OrderWithItems>, AmbassadorManagementError>;

    /// The user with id `user_id`, if they exist and are an ambassador.
    async fn fetch_ambassador(&self, user_id: i64) -> Result<Option<User>, AmbassadorManagementError>;

    /// The referral links owned by `user_id`, in id order.
    async fn fetch_links_for_user(&self, user_id: i64) -> Result<Vec<ReferralLink>, AmbassadorManagementError>;

    /// All completed orders, with their items, placed through links owned by `user_id`.
    async fn fetch_completed_orders_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<OrderWithItems>, AmbassadorManagementError>;
}
