//! A thin client for the parts of the Stripe REST API that a hosted checkout needs: creating checkout
//! sessions.
mod api;
mod config;
mod data_objects;
mod error;
mod helpers;

pub use api::StripeApi;
pub use config::StripeConfig;
pub use data_objects::{CheckoutSession, NewCheckoutSession, SessionLineItem};
pub use error::StripeApiError;
pub use helpers::encode_checkout_session;
