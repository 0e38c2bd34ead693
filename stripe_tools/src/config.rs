use std::time::Duration;

use amb_common::Secret;
use log::*;

const DEFAULT_API_BASE: &str = "https://api.stripe.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// The REST API root, without a trailing slash
    pub api_base: String,
    pub secret_key: Secret<String>,
    /// Requests that take longer than this fail, and the checkout is rolled back
    pub timeout: Duration,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            secret_key: Secret::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl StripeConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_base = std::env::var("AMB_STRIPE_API_BASE").unwrap_or_else(|_| {
            debug!("🪛️ AMB_STRIPE_API_BASE not set, using {DEFAULT_API_BASE}");
            DEFAULT_API_BASE.to_string()
        });
        let secret_key = Secret::new(std::env::var("AMB_STRIPE_SECRET_KEY").unwrap_or_else(|_| {
            warn!("🪛️ AMB_STRIPE_SECRET_KEY not set, using (probably useless) default");
            "sk_test_00000000000000".to_string()
        }));
        let timeout = std::env::var("AMB_STRIPE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("🪛️ Invalid AMB_STRIPE_TIMEOUT_SECS value '{s}': {e}. Using the default."))
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        Self { api_base: api_base.trim_end_matches('/').to_string(), secret_key, timeout }
    }
}
