use billx_core::{BillStoreError, PaymentError, QuoteErrors, ServiceError, ValidationError};
use thiserror::Error;

/// Failures surfaced to the user, each mapped to a process exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("no service returned a quote: {0}")]
    NoQuotes(QuoteErrors),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Bills(#[from] BillStoreError),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Payment(_) => 4,
            Self::NoQuotes(_) | Self::Service(_) => 5,
            Self::Bills(_) => 10,
        }
    }
}
