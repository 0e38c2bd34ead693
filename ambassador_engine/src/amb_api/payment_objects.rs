use amb_common::Cents;
use serde::{Deserialize, Serialize};

/// One line of a hosted checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLineItem {
    pub name: String,
    pub description: String,
    pub image: String,
    /// Price per unit, in the smallest unit of `currency`
    pub unit_amount: Cents,
    pub currency: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSessionRequest {
    pub line_items: Vec<PaymentLineItem>,
    /// Where the provider sends the buyer after a successful payment. The provider substitutes the session id for the
    /// `{CHECKOUT_SESSION_ID}` template, if present.
    pub success_url: String,
    pub cancel_url: String,
}

/// The reference returned by the payment provider for a new checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// The session id. The provider reports it back as the `source` when payment completes.
    pub id: String,
    /// The hosted checkout page
    pub url: Option<String>,
}

/// Static settings for the checkout flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    pub success_url: String,
    pub cancel_url: String,
    pub currency: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            success_url: "http://localhost:5000/success?source={CHECKOUT_SESSION_ID}".to_string(),
            cancel_url: "http://localhost:5000/error".to_string(),
            currency: amb_common::DEFAULT_CURRENCY_CODE.to_string(),
        }
    }
}
