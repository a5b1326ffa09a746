use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//--------------------------------------     Kobo       ---------------------------------------------------------------
/// An amount of Nigerian Naira, expressed in kobo (1/100 NGN).
///
/// Paystack expects all amounts as integer kobo on the wire, while the storefront deals in (fractional) Naira, so
/// conversions in and out of this type are the only place rounding happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Kobo(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in kobo: {0}")]
pub struct KoboConversionError(String);

impl From<i64> for Kobo {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for Kobo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let naira = self.0 as f64 / 100.0;
        write!(f, "₦{naira:0.2}")
    }
}

impl Kobo {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Convert a Naira amount into kobo, rounding to the nearest kobo.
    ///
    /// Non-finite, non-positive, or absurdly large amounts are rejected rather than silently truncated.
    pub fn from_naira(naira: f64) -> Result<Self, KoboConversionError> {
        if !naira.is_finite() {
            return Err(KoboConversionError(format!("{naira} is not a finite amount")));
        }
        if naira <= 0.0 {
            return Err(KoboConversionError(format!("{naira} is not a positive amount")));
        }
        let kobo = (naira * 100.0).round();
        if kobo > i64::MAX as f64 {
            return Err(KoboConversionError(format!("{naira} is too large")));
        }
        #[allow(clippy::cast_possible_truncation)]
        let kobo = kobo as i64;
        Ok(Self(kobo))
    }
}
