use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Currencies the supported services quote between.
///
/// The set is closed: every symbol that can appear in a quote, a stored
/// bill or a payment request is listed here, so downstream code never
/// handles free-form currency strings. `Lightning` is how Living Room of
/// Satoshi advertises Lightning-network BTC and is treated as a
/// cryptocurrency in its own right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    Aud,
    Btc,
    Eth,
    Bch,
    Ltc,
    Xrp,
    Lightning,
}

impl Currency {
    pub const ALL: [Self; 7] = [
        Self::Aud,
        Self::Btc,
        Self::Eth,
        Self::Bch,
        Self::Ltc,
        Self::Xrp,
        Self::Lightning,
    ];

    /// Resolves a user- or wire-supplied symbol, ignoring case and
    /// surrounding whitespace.
    pub fn resolve(symbol: &str) -> Result<Self, ValidationError> {
        let trimmed = symbol.trim();
        Self::ALL
            .into_iter()
            .find(|currency| currency.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownCurrency {
                symbol: trimmed.to_owned(),
            })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aud => "AUD",
            Self::Btc => "BTC",
            Self::Eth => "ETH",
            Self::Bch => "BCH",
            Self::Ltc => "LTC",
            Self::Xrp => "XRP",
            Self::Lightning => "LIGHTNING",
        }
    }

    pub const fn is_fiat(self) -> bool {
        matches!(self, Self::Aud)
    }

    pub const fn is_crypto(self) -> bool {
        !self.is_fiat()
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::resolve(value)
    }
}

impl TryFrom<String> for Currency {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::resolve(&value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.as_str().to_owned()
    }
}
