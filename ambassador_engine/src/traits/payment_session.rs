use std::fmt::Display;

use crate::amb_api::payment_objects::{CheckoutSession, CheckoutSessionRequest};

/// The external payment provider that hosts the checkout page.
///
/// Implementations turn a set of line items and redirect URLs into a hosted payment session. The session id is the
/// reference the provider hands back when the buyer has paid.
#[allow(async_fn_in_trait)]
pub trait PaymentSessionProvider {
    type Error: Display;

    async fn create_checkout_session(&self, request: CheckoutSessionRequest) -> Result<CheckoutSession, Self::Error>;
}
