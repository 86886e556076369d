//! Core contracts for billx.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - Service identifiers and the per-service adapters
//! - The concurrent quote aggregator and ranking helpers
//! - The bill-payment gateway contract and orchestrated flow
//! - The JSON bill address book

pub mod adapters;
pub mod aggregator;
pub mod bills;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod payment;
pub mod price_service;
pub mod ranking;
pub mod registry;
pub mod source;

pub use adapters::{Bit2BillAdapter, LivingRoomAdapter, PaidByCoinsAdapter};
pub use aggregator::{CancelToken, QuoteAggregator, QuoteErrors, QuoteOutcome, ServiceFailure};
pub use bills::{BillStore, BillStoreError};
pub use domain::{
    Amount, BillDefinition, BillPayload, BillPayloadError, BpayDetails, Conversion, Currency,
    EftDetails, Pair, QuoteResult,
};
pub use error::ValidationError;
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
    ScriptedHttpClient,
};
pub use payment::{
    AssetDetail, ExchangeRate, PaymentError, PaymentGateway, PaymentOrchestrator, PaymentRequest,
    PaymentResult, SubmissionReceipt, TransactionRequest,
};
pub use price_service::{Capabilities, PriceService, QuoteRequest, ServiceError, ServiceFuture};
pub use ranking::{
    is_delisted, rank_by_crypto_amount, rank_by_fiat_value, retain_supported, CrossRateIndex,
    ReferenceRates,
};
pub use registry::ServiceRegistry;
pub use source::ServiceId;
