use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::domain::{Amount, Currency, QuoteResult};
use crate::payment::PaymentGateway;
use crate::source::ServiceId;
use crate::ValidationError;

/// Boxed future returned by service trait methods.
pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ServiceError>> + Send + 'a>>;

/// Request for quotes: a fiat amount the caller wants to settle in crypto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteRequest {
    pub amount: Amount,
    pub fiat: Currency,
}

impl QuoteRequest {
    pub fn new(amount: f64, fiat: Currency) -> Result<Self, ValidationError> {
        if !fiat.is_fiat() {
            return Err(ValidationError::NotFiat { currency: fiat });
        }
        Ok(Self {
            amount: Amount::positive("quote amount", amount)?,
            fiat,
        })
    }
}

/// Failure of a single service call.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("transport failure: {message}")]
    Transport { message: String },
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("could not encode request body for {url}: {message}")]
    Encode { url: String, message: String },
    #[error("service reported an error: {message}")]
    Application { message: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no response within {}ms", timeout.as_millis())]
    Timeout { timeout: Duration },
    #[error("cancelled before the call completed")]
    Cancelled,
}

impl From<crate::http_client::HttpError> for ServiceError {
    fn from(error: crate::http_client::HttpError) -> Self {
        Self::Transport {
            message: error.message().to_owned(),
        }
    }
}

/// What a registered service can do, for the `services` listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub quote: bool,
    pub pay: bool,
}

/// Contract implemented by every bill-payment service adapter.
///
/// `quote` returns every pair the service is currently offering for the
/// requested fiat amount. Services that can also place bill payments
/// expose that through [`PriceService::payments`]; the default is
/// quote-only.
pub trait PriceService: Send + Sync {
    fn id(&self) -> ServiceId;

    fn quote<'a>(&'a self, req: &'a QuoteRequest) -> ServiceFuture<'a, Vec<QuoteResult>>;

    fn payments(&self) -> Option<&dyn PaymentGateway> {
        None
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            quote: true,
            pay: self.payments().is_some(),
        }
    }
}
