use std::{env, str::FromStr, time::Duration};

use amb_common::Secret;
use ambassador_engine::{
    cache::invalidation::DEFAULT_PACING,
    payment_objects::CheckoutConfig,
    sqlite::db::DEFAULT_BUSY_TIMEOUT,
};
use log::*;
use stripe_tools::StripeConfig;

const DEFAULT_AMB_HOST: &str = "127.0.0.1";
const DEFAULT_AMB_PORT: u16 = 8000;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/ambassador_store.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 100;
/// The database busy timeout is kept at least this much longer than the payment provider timeout.
const BUSY_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);
const DEFAULT_SMTP_HOST: &str = "host.docker.internal";
const DEFAULT_SMTP_PORT: u16 = 1025;
const DEFAULT_MAIL_FROM: &str = "no-reply@email.com";
const DEFAULT_ADMIN_EMAIL: &str = "admin@admin.com";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Upper bound on open database connections.
    pub max_connections: u32,
    /// How long a checkout waits for another checkout's write transaction. See [`Self::database_busy_timeout`].
    pub db_busy_timeout: Duration,
    /// The Redis instance that holds cached read models and the leaderboard. When `None`, an in-process cache is
    /// used, which is only suitable for a single server instance.
    pub redis_url: Option<String>,
    /// The minimum interval between two cache deletions made by the invalidation worker.
    pub cache_clear_delay: Duration,
    pub checkout: CheckoutConfig,
    pub mail: MailConfig,
    pub stripe: StripeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_AMB_HOST.to_string(),
            port: DEFAULT_AMB_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            db_busy_timeout: DEFAULT_BUSY_TIMEOUT,
            redis_url: None,
            cache_clear_delay: DEFAULT_PACING,
            checkout: CheckoutConfig::default(),
            mail: MailConfig::default(),
            stripe: StripeConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("AMB_HOST").ok().unwrap_or_else(|| DEFAULT_AMB_HOST.into());
        let port = parse_env_or("AMB_PORT", DEFAULT_AMB_PORT);
        let database_url = env::var("AMB_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ AMB_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_connections = parse_env_or("AMB_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS);
        let db_busy_timeout =
            Duration::from_secs(parse_env_or("AMB_DB_BUSY_TIMEOUT_SECS", DEFAULT_BUSY_TIMEOUT.as_secs()));
        let redis_url = env::var("AMB_REDIS_URL").ok().filter(|s| !s.trim().is_empty());
        if redis_url.is_none() {
            warn!(
                "🪛️ AMB_REDIS_URL is not set. Cached listings and the leaderboard will be kept in memory, and are not \
                 shared between server instances."
            );
        }
        let cache_clear_delay =
            Duration::from_millis(parse_env_or("AMB_CACHE_CLEAR_DELAY_MS", DEFAULT_PACING.as_millis() as u64));
        let checkout = checkout_config_from_env();
        let mail = MailConfig::from_env_or_default();
        let stripe = StripeConfig::new_from_env_or_default();
        Self {
            host,
            port,
            database_url,
            max_connections,
            db_busy_timeout,
            redis_url,
            cache_clear_delay,
            checkout,
            mail,
            stripe,
        }
    }

    /// The busy timeout for the database pool.
    ///
    /// A checkout keeps its write transaction open while the payment provider creates the session, and every other
    /// checkout queues behind it. The configured value is therefore raised to the provider timeout plus a margin if
    /// it is shorter. The price is that a checkout may wait that long for a slow provider call ahead of it.
    pub fn database_busy_timeout(&self) -> Duration {
        let floor = self.stripe.timeout + BUSY_TIMEOUT_MARGIN;
        if self.db_busy_timeout < floor {
            warn!(
                "🪛️ The database busy timeout ({}s) is shorter than the Stripe timeout plus margin. Using {}s instead.",
                self.db_busy_timeout.as_secs(),
                floor.as_secs()
            );
            floor
        } else {
            self.db_busy_timeout
        }
    }
}

fn checkout_config_from_env() -> CheckoutConfig {
    let default = CheckoutConfig::default();
    let success_url = env::var("AMB_CHECKOUT_SUCCESS_URL").ok().unwrap_or_else(|| {
        info!("🪛️ AMB_CHECKOUT_SUCCESS_URL is not set. Using {}", default.success_url);
        default.success_url.clone()
    });
    let cancel_url = env::var("AMB_CHECKOUT_CANCEL_URL").ok().unwrap_or_else(|| {
        info!("🪛️ AMB_CHECKOUT_CANCEL_URL is not set. Using {}", default.cancel_url);
        default.cancel_url.clone()
    });
    let currency = env::var("AMB_CHECKOUT_CURRENCY").ok().map(|s| s.to_lowercase()).unwrap_or(default.currency);
    CheckoutConfig { success_url, cancel_url, currency }
}

fn parse_env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(s) => s.parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
        Err(_) => default,
    }
}

//-------------------------------------------------  MailConfig  -------------------------------------------------------
/// Settings for the order-completed notification emails.
#[derive(Clone, Debug)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Optional SMTP credentials. When the username is empty, mail is sent without authentication.
    pub smtp_username: String,
    pub smtp_password: Secret<String>,
    pub from_address: String,
    /// The administrator that is told about every completed order.
    pub admin_email: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            smtp_username: String::default(),
            smtp_password: Secret::default(),
            from_address: DEFAULT_MAIL_FROM.to_string(),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
        }
    }
}

impl MailConfig {
    pub fn from_env_or_default() -> Self {
        let smtp_host = env::var("AMB_SMTP_HOST").ok().unwrap_or_else(|| {
            info!("🪛️ AMB_SMTP_HOST is not set. Using the default, {DEFAULT_SMTP_HOST}.");
            DEFAULT_SMTP_HOST.to_string()
        });
        let smtp_port = parse_env_or("AMB_SMTP_PORT", DEFAULT_SMTP_PORT);
        let smtp_username = env::var("AMB_SMTP_USERNAME").unwrap_or_default();
        let smtp_password = Secret::new(env::var("AMB_SMTP_PASSWORD").unwrap_or_default());
        let from_address = env::var("AMB_MAIL_FROM").ok().unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string());
        let admin_email = env::var("AMB_ADMIN_EMAIL").ok().unwrap_or_else(|| {
            warn!("🪛️ AMB_ADMIN_EMAIL is not set. Order notifications will go to {DEFAULT_ADMIN_EMAIL}.");
            DEFAULT_ADMIN_EMAIL.to_string()
        });
        Self { smtp_host, smtp_port, smtp_username, smtp_password, from_address, admin_email }
    }
}
