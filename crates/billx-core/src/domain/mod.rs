//! Canonical domain models and validation.

mod bill;
mod currency;
mod models;

pub use bill::{BillDefinition, BillPayload, BillPayloadError, BpayDetails, EftDetails};
pub use currency::Currency;
pub use models::{Amount, Conversion, Pair, QuoteResult};
