use std::fmt::Debug;

use log::*;

use crate::{
    amb_api::errors::UserApiError,
    cache::{CacheInvalidator, AMBASSADORS_WITH_REVENUE_KEY},
    db_types::{NewUser, User, UserInfoUpdate},
    traits::UserManagement,
};

/// Registration and profile updates. Every successful write invalidates the ambassador revenue snapshot, since it
/// embeds the user records.
pub struct UserApi<B> {
    db: B,
    invalidator: CacheInvalidator,
}

impl<B> Debug for UserApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserApi")
    }
}

impl<B> UserApi<B> {
    pub fn new(db: B, invalidator: CacheInvalidator) -> Self {
        Self { db, invalidator }
    }
}

impl<B> UserApi<B>
where B: UserManagement
{
    pub async fn register_user(&self, user: NewUser) -> Result<User, UserApiError> {
        for (name, value) in [("first_name", &user.first_name), ("last_name", &user.last_name), ("email", &user.email)]
        {
            if value.trim().is_empty() {
                return Err(UserApiError::MissingField(name.to_string()));
            }
        }
        let user = self.db.insert_user(user).await?;
        info!("👤️ User #{} registered{}", user.id, if user.is_ambassador { " as an ambassador" } else { "" });
        self.invalidator.clear_cache([AMBASSADORS_WITH_REVENUE_KEY]);
        Ok(user)
    }

    pub async fn update_user_info(&self, user_id: i64, update: UserInfoUpdate) -> Result<User, UserApiError> {
        let blank = [("first_name", &update.first_name), ("last_name", &update.last_name), ("email", &update.email)]
            .into_iter()
            .find(|(_, v)| v.as_ref().is_some_and(|v| v.trim().is_empty()));
        if let Some((name, _)) = blank {
            return Err(UserApiError::MissingField(name.to_string()));
        }
        let user = self.db.update_user_info(user_id, update).await?;
        debug!("👤️ User #{user_id} updated their profile");
        self.invalidator.clear_cache([AMBASSADORS_WITH_REVENUE_KEY]);
        Ok(user)
    }
}
