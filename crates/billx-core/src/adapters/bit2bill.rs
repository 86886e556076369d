use std::collections::BTreeMap;
use std::sync::Arc;

use crate::adapters::{decode_json, BROWSER_USER_AGENT};
use crate::domain::{Conversion, Currency, Pair, QuoteResult};
use crate::http_client::{HttpClient, HttpRequest};
use crate::price_service::{PriceService, QuoteRequest, ServiceError, ServiceFuture};
use crate::source::ServiceId;

const RATE_URL: &str = "https://www.bit2bill.com.au/api/rate";

/// Bit2Bill quote adapter.
///
/// The service publishes one flat JSON object of `"<SYMBOL>Rate"` keys.
/// The table is small and curated on their side, so decoding is strict:
/// an unrecognized key or unusable rate fails the whole call instead of
/// silently hiding an offer.
pub struct Bit2BillAdapter {
    http: Arc<dyn HttpClient>,
}

impl Bit2BillAdapter {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    async fn fetch_rates(&self) -> Result<BTreeMap<String, f64>, ServiceError> {
        let request = HttpRequest::get(RATE_URL)
            .with_header("content-type", "application/json")
            .with_header("accept", "application/json")
            .with_header("user-agent", BROWSER_USER_AGENT);
        let response = self.http.execute(request).await?;
        decode_json(RATE_URL, &response)
    }
}

impl PriceService for Bit2BillAdapter {
    fn id(&self) -> ServiceId {
        ServiceId::Bit2Bill
    }

    fn quote<'a>(&'a self, req: &'a QuoteRequest) -> ServiceFuture<'a, Vec<QuoteResult>> {
        Box::pin(async move {
            let rates = self.fetch_rates().await?;

            let mut results = Vec::with_capacity(rates.len());
            for (key, rate) in &rates {
                let symbol = key.strip_suffix("Rate").unwrap_or(key);
                let crypto = Currency::resolve(symbol)?;
                let conversion = Conversion::from_rate(req.amount, *rate)?;
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
}
