use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The currency that checkout sessions are priced in.
pub const DEFAULT_CURRENCY_CODE: &str = "usd";

//--------------------------------------        Cents         ---------------------------------------------------------
/// An amount in the smallest unit of the checkout currency. Payment providers want integer unit amounts, while the
/// catalog stores prices as floating point dollars, so conversion happens exactly once, at the provider boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in cents: {0}")]
pub struct CentsConversionError(String);

impl From<i64> for Cents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

impl Cents {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Converts a dollar amount into cents, rounding to the nearest cent. Negative, non-finite and out-of-range
    /// values are rejected.
    pub fn from_dollars(dollars: f64) -> Result<Self, CentsConversionError> {
        if !dollars.is_finite() {
            return Err(CentsConversionError(format!("{dollars} is not a finite amount")));
        }
        if dollars < 0.0 {
            return Err(CentsConversionError(format!("{dollars} is negative")));
        }
        let cents = (dollars * 100.0).round();
        if cents > i64::MAX as f64 {
            return Err(CentsConversionError(format!("{dollars} is too large")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(cents as i64))
    }
}
