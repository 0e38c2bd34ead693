use ambassador_engine::{
    payment_objects::{CheckoutSession, CheckoutSessionRequest, PaymentLineItem},
    traits::PaymentSessionProvider,
};
use log::*;
use stripe_tools::{NewCheckoutSession, SessionLineItem, StripeApi, StripeApiError, StripeConfig};

/// Hosts checkout pages on Stripe.
#[derive(Clone)]
pub struct StripeSessionProvider {
    api: StripeApi,
}

impl StripeSessionProvider {
    pub fn new(config: StripeConfig) -> Result<Self, StripeApiError> {
        let api = StripeApi::new(config)?;
        Ok(Self { api })
    }
}

impl PaymentSessionProvider for StripeSessionProvider {
    type Error = StripeApiError;

    async fn create_checkout_session(&self, request: CheckoutSessionRequest) -> Result<CheckoutSession, Self::Error> {
        let session = new_checkout_session(request);
        let created = self.api.create_checkout_session(&session).await.map_err(|e| {
            warn!("💳️ Stripe did not create a checkout session. {e}");
            e
        })?;
        Ok(CheckoutSession { id: created.id, url: created.url })
    }
}

pub fn new_checkout_session(request: CheckoutSessionRequest) -> NewCheckoutSession {
    let line_items = request.line_items.into_iter().map(session_line_item).collect();
    NewCheckoutSession { line_items, success_url: request.success_url, cancel_url: request.cancel_url }
}

fn session_line_item(item: PaymentLineItem) -> SessionLineItem {
    let images = if item.image.trim().is_empty() { vec![] } else { vec![item.image] };
    SessionLineItem {
        name: item.name,
        description: item.description,
        images,
        unit_amount: item.unit_amount,
        currency: item.currency,
        quantity: item.quantity,
    }
}
