use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ValidationError;

/// BPAY payment target: biller code plus customer reference number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BpayDetails {
    pub code: u32,
    pub reference: String,
}

/// Direct-deposit payment target for Australian bank accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EftDetails {
    pub bsb: String,
    pub account_number: String,
    pub account_name: String,
    /// Statement text shown to the receiving account, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remitter: Option<String>,
}

/// A saved bill in the address book.
///
/// Exactly one payment target must be present. The stored shape keeps both
/// slots so the file stays hand-editable; [`BillDefinition::payload`]
/// enforces the invariant before a bill is used for anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpay: Option<BpayDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eft: Option<EftDetails>,
}

/// The payment target selected from a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillPayload<'a> {
    Bpay(&'a BpayDetails),
    Eft(&'a EftDetails),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BillPayloadError {
    #[error("bill '{name}' has no payment details")]
    Missing { name: String },
    #[error("bill '{name}' has both BPAY and EFT details, expected exactly one")]
    Ambiguous { name: String },
}

impl BillDefinition {
    pub fn bpay(name: impl Into<String>, details: BpayDetails) -> Result<Self, ValidationError> {
        Self::checked(name.into(), Some(details), None)
    }

    pub fn eft(name: impl Into<String>, details: EftDetails) -> Result<Self, ValidationError> {
        Self::checked(name.into(), None, Some(details))
    }

    fn checked(
        name: String,
        bpay: Option<BpayDetails>,
        eft: Option<EftDetails>,
    ) -> Result<Self, ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyBillName);
        }
        Ok(Self { name, bpay, eft })
    }

    /// Selects the bill's payment target, failing unless exactly one is set.
    pub fn payload(&self) -> Result<BillPayload<'_>, BillPayloadError> {
        match (&self.bpay, &self.eft) {
            (Some(bpay), None) => Ok(BillPayload::Bpay(bpay)),
            (None, Some(eft)) => Ok(BillPayload::Eft(eft)),
            (None, None) => Err(BillPayloadError::Missing {
                name: self.name.clone(),
            }),
            (Some(_), Some(_)) => Err(BillPayloadError::Ambiguous {
                name: self.name.clone(),
            }),
        }
    }
}
