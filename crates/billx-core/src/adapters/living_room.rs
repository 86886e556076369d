use std::collections::BTreeMap;
use std::sync::Arc;

use crate::adapters::{decode_json, BROWSER_USER_AGENT};
use crate::domain::{Conversion, Currency, Pair, QuoteResult};
use crate::http_client::{HttpClient, HttpRequest};
use crate::price_service::{PriceService, QuoteRequest, ServiceError, ServiceFuture};
use crate::source::ServiceId;

const RATES_URL: &str = "https://www.livingroomofsatoshi.com/api/v1/current_rates";

/// Living Room of Satoshi quote adapter.
///
/// The service lists everything it trades as `"FIAT_CRYPTO"` keys and the
/// feed routinely carries symbols outside our registry, so decoding is
/// best effort: entries that cannot be used are logged and skipped rather
/// than failing the call.
pub struct LivingRoomAdapter {
    http: Arc<dyn HttpClient>,
}

impl LivingRoomAdapter {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    async fn fetch_rates(&self) -> Result<BTreeMap<String, f64>, ServiceError> {
        let request = HttpRequest::get(RATES_URL)
            .with_header("content-type", "application/json")
            .with_header("accept", "application/json")
            .with_header("user-agent", BROWSER_USER_AGENT);
        let response = self.http.execute(request).await?;
        decode_json(RATES_URL, &response)
    }
}

impl PriceService for LivingRoomAdapter {
    fn id(&self) -> ServiceId {
        ServiceId::LivingRoomOfSatoshi
    }

    fn quote<'a>(&'a self, req: &'a QuoteRequest) -> ServiceFuture<'a, Vec<QuoteResult>> {
        Box::pin(async move {
            let rates = self.fetch_rates().await?;

            let mut results = Vec::new();
            for (key, rate) in &rates {
                let Some((fiat_symbol, crypto_symbol)) = key.split_once('_') else {
                    tracing::warn!(key = %key, "skipping rate key without a pair separator");
                    continue;
                };
                let fiat = match Currency::resolve(fiat_symbol) {
                    Ok(fiat) => fiat,
                    Err(error) => {
                        tracing::warn!(key = %key, %error, "skipping pair with unknown fiat");
                        continue;
                    }
                };
                if fiat != req.fiat {
                    tracing::debug!(key = %key, "skipping pair quoted in a different fiat");
                    continue;
                }
                let crypto = match Currency::resolve(crypto_symbol) {
                    Ok(crypto) => crypto,
                    Err(error) => {
                        tracing::warn!(key = %key, %error, "skipping pair with unknown crypto");
                        continue;
                    }
                };
                let conversion = match Conversion::from_rate(req.amount, *rate) {
                    Ok(conversion) => conversion,
                    Err(error) => {
                        tracing::warn!(key = %key, %error, "skipping pair with unusable rate");
                        continue;
                    }
                };
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
