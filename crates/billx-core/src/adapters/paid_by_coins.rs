use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapters::{decode_json, BROWSER_USER_AGENT};
use crate::domain::{Conversion, Currency, Pair, QuoteResult};
use crate::http_client::{HttpClient, HttpRequest};
use crate::payment::{
    AssetDetail, ExchangeRate, PaymentGateway, SubmissionReceipt, TransactionRequest,
};
use crate::price_service::{PriceService, QuoteRequest, ServiceError, ServiceFuture};
use crate::source::ServiceId;

const API_BASE: &str = "https://api.paidbycoins.com";

/// Paid By Coins adapter: quoting plus the full payment gateway.
///
/// Rates are quoted against the caller's session and the eventual
/// transaction must come from the same session, which is why every call
/// goes through the shared cookie-carrying transport.
pub struct PaidByCoinsAdapter {
    http: Arc<dyn HttpClient>,
}

impl PaidByCoinsAdapter {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    fn prepare(request: HttpRequest) -> HttpRequest {
        request
            .with_header("content-type", "application/json")
            .with_header("accept", "application/json")
            .with_header("user-agent", BROWSER_USER_AGENT)
            .with_header("sw", "sexir")
            .with_header("origin", "https://paidbycoins.com")
    }

    pub async fn fetch_currency_details(&self) -> Result<Vec<AssetDetail>, ServiceError> {
        let url = format!("{API_BASE}/tran/details");
        let response = self.http.execute(Self::prepare(HttpRequest::get(&url))).await?;
        let decoded: CurrenciesResponse = decode_json(&url, &response)?;
        if !decoded.message.is_empty() {
            return Err(ServiceError::Application {
                message: decoded.message,
            });
        }
        Ok(decoded.items.currency_details)
    }

    pub async fn fetch_exchange_rate(&self, crypto: Currency) -> Result<ExchangeRate, ServiceError> {
        let url = format!("{API_BASE}/tran/exchgrate/{}", crypto.as_str());
        let response = self.http.execute(Self::prepare(HttpRequest::get(&url))).await?;
        let rate: ExchangeRate = decode_json(&url, &response)?;
        tracing::debug!(
            primary = %rate.primary_currency,
            secondary = %rate.secondary_currency,
            price = rate.price,
            "exchange rate fetched"
        );
        Ok(rate)
    }

    /// Biller lookup; the endpoint answers with a bare JSON string.
    pub async fn fetch_biller_name(&self, code: u32) -> Result<String, ServiceError> {
        let url = format!("{API_BASE}/common/biller/{code}");
        let response = self.http.execute(Self::prepare(HttpRequest::get(&url))).await?;
        decode_json(&url, &response)
    }

    /// BSB lookup; the endpoint answers with a bare JSON string.
    pub async fn fetch_bank_name(&self, bsb: &str) -> Result<String, ServiceError> {
        let url = format!("{API_BASE}/common/bsb/{bsb}");
        let response = self.http.execute(Self::prepare(HttpRequest::get(&url))).await?;
        decode_json(&url, &response)
    }

    pub async fn submit_transaction(
        &self,
        transaction: &TransactionRequest,
    ) -> Result<SubmissionReceipt, ServiceError> {
        let url = format!("{API_BASE}/tran/add");
        // The service expects the indented encoder output.
        let body =
            serde_json::to_string_pretty(transaction).map_err(|error| ServiceError::Encode {
                url: url.clone(),
                message: error.to_string(),
            })?;
        let request = Self::prepare(HttpRequest::post(&url).with_body(body));
        let response = self.http.execute(request).await?;
        let decoded: TransactionResponse = decode_json(&url, &response)?;
        if !decoded.message.is_empty() {
            return Err(ServiceError::Application {
                message: decoded.message,
            });
        }
        Ok(SubmissionReceipt {
            address: decoded.to_address,
            total_amount: decoded.total_amount,
        })
    }

    /// Checks whether an email address has been verified with the service.
    pub async fn verify_email(&self, email: &str) -> Result<bool, ServiceError> {
        let url = format!("{API_BASE}/email/veml?email={}", urlencoding::encode(email));
        let response = self.http.execute(Self::prepare(HttpRequest::get(&url))).await?;
        let decoded: VerifyEmailResponse = decode_json(&url, &response)?;
        if !decoded.message.is_empty() {
            return Err(ServiceError::Application {
                message: decoded.message,
            });
        }
        Ok(decoded.is_verified)
    }

    /// Confirms the pin the service emailed during verification.
    pub async fn verify_pin(&self, email: &str, pin: &str) -> Result<(), ServiceError> {
        let url = format!("{API_BASE}/email/vep");
        let body = serde_json::to_string(&VerifyPinRequest { email, pin }).map_err(|error| {
            ServiceError::Encode {
                url: url.clone(),
                message: error.to_string(),
            }
        })?;
        let request = Self::prepare(HttpRequest::post(&url).with_body(body));
        let response = self.http.execute(request).await?;
        if !response.is_success() {
            return Err(ServiceError::Status {
                status: response.status,
                url,
            });
        }
        // The endpoint replies with a literal `true`, not a JSON document.
        if response.body.trim() != "true" {
            return Err(ServiceError::Application {
                message: format!("unexpected verification reply: {}", response.body.trim()),
            });
        }
        Ok(())
    }
}

impl PriceService for PaidByCoinsAdapter {
    fn id(&self) -> ServiceId {
        ServiceId::PaidByCoins
    }

    fn quote<'a>(&'a self, req: &'a QuoteRequest) -> ServiceFuture<'a, Vec<QuoteResult>> {
        Box::pin(async move {
            let details = self.fetch_currency_details().await?;

            let mut results = Vec::with_capacity(details.len());
            for detail in details {
                let crypto = match Currency::resolve(&detail.short_form) {
                    Ok(crypto) => crypto,
                    Err(error) => {
                        tracing::warn!(symbol = %detail.short_form, %error, "skipping unlisted asset");
                        continue;
                    }
                };

                // One rate call per asset; a rate failure invalidates the
                // whole result set, not just this asset.
                let rate = self.fetch_exchange_rate(crypto).await?;
                let conversion = Conversion::from_rate(req.amount, rate.price)?;
                results.push(QuoteResult {
                    service: self.id(),
                    pair: Pair {
                        fiat: req.fiat,
                        crypto,
                    },
                    conversion,
                });
            }

            Ok(results)
        })
    }

    fn payments(&self) -> Option<&dyn PaymentGateway> {
        Some(self)
    }
}

impl PaymentGateway for PaidByCoinsAdapter {
    fn exchange_rate<'a>(&'a self, crypto: Currency) -> ServiceFuture<'a, ExchangeRate> {
        Box::pin(self.fetch_exchange_rate(crypto))
    }

    fn currency_details<'a>(&'a self) -> ServiceFuture<'a, Vec<AssetDetail>> {
        Box::pin(self.fetch_currency_details())
    }

    fn biller_name<'a>(&'a self, code: u32) -> ServiceFuture<'a, String> {
        Box::pin(self.fetch_biller_name(code))
    }

    fn bank_name<'a>(&'a self, bsb: &'a str) -> ServiceFuture<'a, String> {
        Box::pin(self.fetch_bank_name(bsb))
    }

    fn submit<'a>(
        &'a self,
        transaction: &'a TransactionRequest,
    ) -> ServiceFuture<'a, SubmissionReceipt> {
        Box::pin(self.submit_transaction(transaction))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CurrenciesResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    items: CurrencyItems,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CurrencyItems {
    #[serde(default)]
    currency_details: Vec<AssetDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TransactionResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    to_address: String,
    #[serde(default)]
    total_amount: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct VerifyPinRequest<'a> {
    email: &'a str,
    pin: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VerifyEmailResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    is_verified: bool,
}
