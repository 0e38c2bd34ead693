use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

/// The body of a payment confirmation. `source` is the checkout session id that the payment provider appended to the
/// success URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmOrderRequest {
    #[serde(default)]
    pub source: String,
}
