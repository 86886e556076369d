use serde::{Deserialize, Serialize};

use crate::domain::Currency;
use crate::source::ServiceId;
use crate::ValidationError;

/// A monetary quantity in some currency, fiat or crypto.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> f64 {
        self.0
    }

    /// Validates an amount that must make sense as money changing hands.
    pub fn positive(field: &'static str, value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ValidationError::AmountNotPositive { field, value });
        }
        Ok(Self(value))
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A fiat/crypto market pair, e.g. AUD/BTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub fiat: Currency,
    pub crypto: Currency,
}

impl std::fmt::Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.fiat, self.crypto)
    }
}

/// A priced conversion: how much crypto the service wants for a fiat amount.
///
/// `rate` is the service's fiat-per-crypto price; `crypto` is always derived
/// as `fiat / rate` so the two stay consistent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub fiat: Amount,
    pub crypto: Amount,
    pub rate: f64,
}

impl Conversion {
    pub fn from_rate(fiat: Amount, rate: f64) -> Result<Self, ValidationError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ValidationError::RateNotPositive { rate });
        }
        Ok(Self {
            fiat,
            crypto: Amount::new(fiat.value() / rate),
            rate,
        })
    }
}

/// One service's quote for one pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub service: ServiceId,
    pub pair: Pair,
    pub conversion: Conversion,
}
