use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Amount, BillDefinition, BillPayload, BillPayloadError, Currency};
use crate::price_service::{ServiceError, ServiceFuture};
use crate::registry::ServiceRegistry;
use crate::source::ServiceId;
use crate::ValidationError;

/// A quoted exchange rate tied to the service session that produced it.
///
/// `exchange_id` and `rtx_val` must be echoed back verbatim when the
/// transaction is submitted, otherwise the service rejects the quote.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExchangeRate {
    #[serde(default)]
    pub primary_currency: String,
    #[serde(default)]
    pub secondary_currency: String,
    pub price: f64,
    #[serde(rename = "ExchgID")]
    pub exchange_id: i64,
    #[serde(rename = "RTXVal")]
    pub rtx_val: f64,
}

/// Per-asset metadata the service publishes alongside its rates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssetDetail {
    /// Symbol as the service spells it, e.g. "BTC".
    pub short_form: String,
    /// Service-internal asset name, echoed in the transaction body.
    #[serde(rename = "Type")]
    pub asset_type: String,
    #[serde(default)]
    pub transaction_charge: f64,
    #[serde(default)]
    pub brokerage_percent: f64,
    #[serde(default, rename = "GSTPercent")]
    pub gst_percent: f64,
}

/// Transaction submission body.
///
/// Field spelling follows the service's wire format exactly; the fields
/// without `Option` are always serialized, zero-valued or not. The
/// method-specific fields (BPAY vs EFT) are omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biller_code: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biller_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_code: Option<String>,

    #[serde(rename = "BSB", skip_serializing_if = "Option::is_none")]
    pub bsb: Option<String>,
    #[serde(rename = "BSBName", skip_serializing_if = "Option::is_none")]
    pub bsb_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub entered_amount: f64,
    pub currency_type: String,
    pub entered_currency: String,
    pub currency_exch_rate: f64,
    /// Crypto total as a string with five decimal places.
    pub total_amount: String,
    pub email: String,
    pub has_email: bool,
    #[serde(rename = "SessionID")]
    pub session_id: String,
    pub alternate_address: String,
    pub transaction_service_amount: i64,
    #[serde(rename = "RTXVal")]
    pub rtx_val: f64,
    #[serde(rename = "QuoteExchgID")]
    pub quote_exchange_id: i64,
    #[serde(rename = "CurrencyRatePerAUD")]
    pub currency_rate_per_aud: i64,
}

/// What the service acknowledged after a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    /// Crypto address the user must fund.
    pub address: String,
    /// Crypto amount to send.
    pub total_amount: f64,
}

/// The service-side calls a bill payment is orchestrated from.
///
/// Implemented by adapters whose service can actually place payments;
/// quote-only services never expose one.
pub trait PaymentGateway: Send + Sync {
    /// Current fiat-per-crypto rate, quoted against this session.
    fn exchange_rate<'a>(&'a self, crypto: Currency) -> ServiceFuture<'a, ExchangeRate>;

    /// Metadata for every asset the service currently accepts.
    fn currency_details<'a>(&'a self) -> ServiceFuture<'a, Vec<AssetDetail>>;

    /// Registered biller name for a BPAY biller code. Empty when unknown.
    fn biller_name<'a>(&'a self, code: u32) -> ServiceFuture<'a, String>;

    /// Bank branch name for a BSB. Empty when unknown.
    fn bank_name<'a>(&'a self, bsb: &'a str) -> ServiceFuture<'a, String>;

    /// Submits the assembled transaction.
    fn submit<'a>(&'a self, transaction: &'a TransactionRequest) -> ServiceFuture<'a, SubmissionReceipt>;
}

/// A validated request to pay a bill with crypto through one service.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub amount: Amount,
    pub fiat: Currency,
    pub crypto: Currency,
    pub service: ServiceId,
    pub auth_email: String,
}

impl PaymentRequest {
    pub fn new(
        amount: f64,
        fiat: Currency,
        crypto: Currency,
        service: ServiceId,
        auth_email: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if !fiat.is_fiat() {
            return Err(ValidationError::NotFiat { currency: fiat });
        }
        if !crypto.is_crypto() {
            return Err(ValidationError::NotCrypto { currency: crypto });
        }
        let auth_email = auth_email.into();
        if auth_email.trim().is_empty() {
            return Err(ValidationError::EmptyAuthEmail);
        }
        Ok(Self {
            amount: Amount::positive("payment amount", amount)?,
            fiat,
            crypto,
            service,
            auth_email,
        })
    }
}

/// Outcome of a successful payment submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentResult {
    /// Address to send the crypto to.
    pub address: String,
    /// Crypto amount the service expects at that address.
    pub amount: Amount,
}

/// Failures of the payment flow, in step order.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("service '{service}' is not registered")]
    ServiceNotRegistered { service: ServiceId },
    #[error("service '{service}' does not support bill payments")]
    PaymentsUnsupported { service: ServiceId },
    #[error(transparent)]
    Bill(#[from] BillPayloadError),
    #[error("no usable exchange rate for {crypto}: {source}")]
    RateUnavailable {
        crypto: Currency,
        source: ServiceError,
    },
    #[error("'{crypto}' is not available for payments on this service")]
    UnsupportedAsset { crypto: Currency },
    #[error("no {target} found for '{key}'")]
    TargetNotFound { target: &'static str, key: String },
    #[error("payment rejected: {reason}")]
    SubmissionRejected { reason: String },
    #[error("payment was submitted but the outcome could not be confirmed: {source}")]
    SubmissionStateUnknown { source: ServiceError },
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Drives the multi-call payment flow against one service.
///
/// The steps run strictly in order and the flow aborts on the first
/// failure, so nothing is ever submitted from stale data:
///
/// 1. quote the exchange rate for the chosen crypto
/// 2. fetch asset metadata and require the chosen crypto in it
/// 3. resolve the biller or bank-branch display name
/// 4. assemble the transaction body with a fresh session id
/// 5. submit
///
/// Failures before step 5 are safe to retry; a failure while reading the
/// step-5 response is reported as [`PaymentError::SubmissionStateUnknown`]
/// because the payment may have been placed.
pub struct PaymentOrchestrator {
    registry: Arc<ServiceRegistry>,
}

impl PaymentOrchestrator {
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self { registry }
    }

    /// Resolves the requested service and pays the bill through it.
    pub async fn pay(
        &self,
        request: &PaymentRequest,
        bill: &BillDefinition,
    ) -> Result<PaymentResult, PaymentError> {
        // A malformed bill must fail before any network traffic.
        let payload = bill.payload()?;

        let service =
            self.registry
                .get(request.service)
                .ok_or(PaymentError::ServiceNotRegistered {
                    service: request.service,
                })?;
        let gateway = service
            .payments()
            .ok_or(PaymentError::PaymentsUnsupported {
                service: request.service,
            })?;

        Self::execute(gateway, request, payload).await
    }

    /// Runs the payment flow against a specific gateway.
    pub async fn execute(
        gateway: &dyn PaymentGateway,
        request: &PaymentRequest,
        payload: BillPayload<'_>,
    ) -> Result<PaymentResult, PaymentError> {
        let rate = gateway
            .exchange_rate(request.crypto)
            .await
            .map_err(|source| PaymentError::RateUnavailable {
                crypto: request.crypto,
                source,
            })?;
        if !rate.price.is_finite() || rate.price <= 0.0 {
            return Err(PaymentError::RateUnavailable {
                crypto: request.crypto,
                source: ServiceError::Validation(ValidationError::RateNotPositive {
                    rate: rate.price,
                }),
            });
        }
        tracing::debug!(
            crypto = %request.crypto,
            price = rate.price,
            exchange_id = rate.exchange_id,
            "exchange rate quoted"
        );

        let details = gateway.currency_details().await?;
        let detail = details
            .iter()
            .find(|detail| detail.short_form.eq_ignore_ascii_case(request.crypto.as_str()))
            .ok_or(PaymentError::UnsupportedAsset {
                crypto: request.crypto,
            })?;

        let display_name = match payload {
            BillPayload::Bpay(bpay) => {
                let name = gateway.biller_name(bpay.code).await?;
                if name.trim().is_empty() {
                    return Err(PaymentError::TargetNotFound {
                        target: "biller",
                        key: bpay.code.to_string(),
                    });
                }
                name
            }
            BillPayload::Eft(eft) => {
                let name = gateway.bank_name(&eft.bsb).await?;
                if name.trim().is_empty() {
                    return Err(PaymentError::TargetNotFound {
                        target: "bank branch",
                        key: eft.bsb.clone(),
                    });
                }
                name
            }
        };

        let transaction = build_transaction(request, &rate, detail, payload, &display_name);

        match gateway.submit(&transaction).await {
            Ok(receipt) if receipt.address.trim().is_empty() => {
                Err(PaymentError::SubmissionRejected {
                    reason: "service returned no payment address".to_owned(),
                })
            }
            Ok(receipt) => Ok(PaymentResult {
                address: receipt.address,
                amount: Amount::new(receipt.total_amount),
            }),
            Err(ServiceError::Application { message }) => {
                Err(PaymentError::SubmissionRejected { reason: message })
            }
            Err(error) => Err(PaymentError::SubmissionStateUnknown { source: error }),
        }
    }
}

fn build_transaction(
    request: &PaymentRequest,
    rate: &ExchangeRate,
    detail: &AssetDetail,
    payload: BillPayload<'_>,
    display_name: &str,
) -> TransactionRequest {
    let total = request.amount.value() / rate.price;

    let mut transaction = TransactionRequest {
        biller_code: None,
        biller_name: None,
        ref_code: None,
        bsb: None,
        bsb_name: None,
        account_no: None,
        account_name: None,
        description: None,
        entered_amount: request.amount.value(),
        currency_type: detail.asset_type.clone(),
        entered_currency: request.fiat.as_str().to_owned(),
        currency_exch_rate: rate.price,
        total_amount: format!("{total:.5}"),
        email: request.auth_email.clone(),
        has_email: true,
        session_id: Uuid::new_v4().to_string(),
        alternate_address: String::new(),
        transaction_service_amount: 0,
        rtx_val: rate.rtx_val,
        quote_exchange_id: rate.exchange_id,
        currency_rate_per_aud: 0,
    };

    match payload {
        BillPayload::Bpay(bpay) => {
            transaction.biller_code = Some(bpay.code);
            transaction.biller_name = Some(display_name.to_owned());
            transaction.ref_code = Some(bpay.reference.clone());
        }
        BillPayload::Eft(eft) => {
            transaction.bsb = Some(eft.bsb.clone());
            transaction.bsb_name = Some(display_name.to_owned());
            transaction.account_no = Some(eft.account_number.clone());
            transaction.account_name = Some(eft.account_name.clone());
            transaction.description = eft.remitter.clone();
        }
    }

    transaction
}
