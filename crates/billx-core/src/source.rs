use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical identifiers for the supported bill-payment services.
///
/// The short code is what users type on the command line and what appears
/// in quote listings; `name` is the service's trading name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceId {
    #[serde(rename = "lros")]
    LivingRoomOfSatoshi,
    #[serde(rename = "pbc")]
    PaidByCoins,
    #[serde(rename = "b2b")]
    Bit2Bill,
}

impl ServiceId {
    pub const ALL: [Self; 3] = [Self::LivingRoomOfSatoshi, Self::PaidByCoins, Self::Bit2Bill];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LivingRoomOfSatoshi => "lros",
            Self::PaidByCoins => "pbc",
            Self::Bit2Bill => "b2b",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::LivingRoomOfSatoshi => "Living Room of Satoshi",
            Self::PaidByCoins => "Paid By Coins",
            Self::Bit2Bill => "Bit2Bill",
        }
    }
}

impl Display for ServiceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lros" => Ok(Self::LivingRoomOfSatoshi),
            "pbc" => Ok(Self::PaidByCoins),
            "b2b" => Ok(Self::Bit2Bill),
            other => Err(ValidationError::UnknownService {
                value: other.to_owned(),
            }),
        }
    }
}
