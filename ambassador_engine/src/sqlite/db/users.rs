use log::debug;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewUser, User, UserInfoUpdate},
    traits::UserManagementError,
};

pub async fn fetch_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(user_id).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, UserManagementError> {
    let email = user.email.clone();
    let result = sqlx::query_as(
        r#"
            INSERT INTO users (first_name, last_name, email, is_ambassador)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(user.first_name)
    .bind(user.last_name)
    .bind(user.email)
    .bind(user.is_ambassador)
    .fetch_one(conn)
    .await;
    match result {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(UserManagementError::EmailAlreadyRegistered(email))
        },
        Err(e) => Err(e.into()),
    }
}

/// Updates the fields that are set in `update`. An empty update is a no-op that returns the current record.
pub async fn update_user_info(
    user_id: i64,
    update: UserInfoUpdate,
    conn: &mut SqliteConnection,
) -> Result<User, UserManagementError> {
    if update.is_empty() {
        debug!("🗃️ No fields to update for user #{user_id}. Update request skipped.");
        return fetch_user(user_id, conn).await?.ok_or(UserManagementError::UserNotFound(user_id));
    }
    let email = update.email.clone();
    let mut builder = QueryBuilder::new("UPDATE users SET ");
    let mut set_clause = builder.separated(", ");
    if let Some(first_name) = update.first_name {
        set_clause.push("first_name = ");
        set_clause.push_bind_unseparated(first_name);
    }
    if let Some(last_name) = update.last_name {
        set_clause.push("last_name = ");
        set_clause.push_bind_unseparated(last_name);
    }
    if let Some(email) = update.email {
        set_clause.push("email = ");
        set_clause.push_bind_unseparated(email);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(user_id);
    builder.push(" RETURNING *");
    let result = builder.build_query_as::<User>().fetch_optional(conn).await;
    match result {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(UserManagementError::UserNotFound(user_id)),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(UserManagementError::EmailAlreadyRegistered(email.unwrap_or_default()))
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_ambassadors(conn: &mut SqliteConnection) -> Result<Vec<User>, sqlx::Error> {
    let users = sqlx::query_as("SELECT * FROM users WHERE is_ambassador = 1 ORDER BY id").fetch_all(conn).await?;
    Ok(users)
}

pub async fn fetch_ambassador(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1 AND is_ambassador = 1")
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}
