use thiserror::Error;

use crate::db_types::{NewUser, User, UserInfoUpdate};

#[derive(Debug, Clone, Error)]
pub enum UserManagementError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The email address {0} is already registered")]
    EmailAlreadyRegistered(String),
    #[error("User {0} does not exist")]
    UserNotFound(i64),
}

impl From<sqlx::Error> for UserManagementError {
    fn from(e: sqlx::Error) -> Self {
        UserManagementError::DatabaseError(e.to_string())
    }
}

/// Writes and point reads for user records. Credentials are not managed here; they belong to the authentication
/// service in front of the engine.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, UserManagementError>;

    /// Registers a new user. Email addresses are unique.
    async fn insert_user(&self, user: NewUser) -> Result<User, UserManagementError>;

    /// Updates the profile fields that are set in `update`, and returns the updated record.
    async fn update_user_info(&self, user_id: i64, update: UserInfoUpdate) -> Result<User, UserManagementError>;
}
