//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interactions are simple functions (rather than stateful structs) that accept a `&mut SqliteConnection`
//! argument. Callers can obtain a connection from a pool, or open an atomic transaction as the need arises and call
//! through to the functions without any other changes.
use std::{str::FromStr, time::Duration};

use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod links;
pub mod orders;
pub mod products;
pub mod users;

/// Connections are recycled after this long, whether or not they are idle.
pub const MAX_CONNECTION_LIFETIME: Duration = Duration::from_secs(60 * 60);
/// Idle connections above the pool minimum are closed after this long.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(10 * 60);
/// How long a writer waits for another connection's write transaction to finish before giving up with
/// `database is locked`.
///
/// A checkout holds its write transaction open while the payment provider creates the session, so this must be longer
/// than the provider's request timeout. Otherwise concurrent checkouts fail whenever the provider is slow.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(30);

pub async fn new_pool(url: &str, max_connections: u32, busy_timeout: Duration) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?.busy_timeout(busy_timeout);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .max_lifetime(MAX_CONNECTION_LIFETIME)
        .idle_timeout(IDLE_TIMEOUT)
        .connect_with(options)
        .await?;
    info!(
        "🗃️ Connected to {url} with up to {max_connections} connections. Writers wait up to {}s for a lock.",
        busy_timeout.as_secs()
    );
    Ok(pool)
}
