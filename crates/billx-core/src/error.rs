use thiserror::Error;

use crate::domain::Currency;

/// Validation and contract errors exposed by `billx-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("unknown currency '{symbol}', expected one of AUD, BTC, ETH, BCH, LTC, XRP, LIGHTNING")]
    UnknownCurrency { symbol: String },
    #[error("unknown service '{value}', expected one of lros, pbc, b2b")]
    UnknownService { value: String },

    #[error("{field} must be a positive finite amount, got {value}")]
    AmountNotPositive { field: &'static str, value: f64 },
    #[error("conversion rate must be positive and finite, got {rate}")]
    RateNotPositive { rate: f64 },

    #[error("'{currency}' is not a fiat currency")]
    NotFiat { currency: Currency },
    #[error("'{currency}' is not a cryptocurrency")]
    NotCrypto { currency: Currency },

    #[error("authorization email cannot be empty")]
    EmptyAuthEmail,
    #[error("bill name cannot be empty")]
    EmptyBillName,
}
