use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::adapters::decode_json;
use crate::domain::{Currency, QuoteResult};
use crate::http_client::{HttpClient, HttpRequest};
use crate::price_service::ServiceError;

const TICKER_BASE: &str = "https://apiv2.bitcoinaverage.com/indices/global/ticker/";

/// Symbols that still show up in service feeds but can no longer be
/// purchased; quotes for them are dropped before ranking. Matching is by
/// symbol string so additions survive registry growth.
const DELISTED_SYMBOLS: &[&str] = &[
    "SDB", "BTX", "XEM", "DCR", "STEEM", "SBD", "DOGE", "ETC", "OMG", "DASH", "LIGHTNING", "PIVX",
];

pub fn is_delisted(crypto: Currency) -> bool {
    DELISTED_SYMBOLS
        .iter()
        .any(|symbol| symbol.eq_ignore_ascii_case(crypto.as_str()))
}

/// Drops quotes for delisted assets, in place.
pub fn retain_supported(results: &mut Vec<QuoteResult>) {
    results.retain(|result| !is_delisted(result.pair.crypto));
}

/// Market reference rates, one per crypto, used to value quotes in fiat.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReferenceRates {
    rates: HashMap<Currency, f64>,
}

impl ReferenceRates {
    pub fn get(&self, crypto: Currency) -> Option<f64> {
        self.rates.get(&crypto).copied()
    }

    /// Fiat value of the crypto a quote asks for, at the reference rate.
    /// Quotes without a known rate value as zero.
    pub fn fiat_value(&self, result: &QuoteResult) -> f64 {
        self.get(result.pair.crypto).unwrap_or(0.0) * result.conversion.crypto.value()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl FromIterator<(Currency, f64)> for ReferenceRates {
    fn from_iter<I: IntoIterator<Item = (Currency, f64)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TickerResponse {
    // The feed spells this "last"; older snapshots capitalized it.
    #[serde(alias = "Last")]
    last: f64,
}

/// Secondary market-rate source for valuing service quotes back into fiat.
pub struct CrossRateIndex {
    http: Arc<dyn HttpClient>,
}

impl CrossRateIndex {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// Fetches one reference rate per distinct crypto in `results`.
    ///
    /// Any lookup failure fails the whole pass; callers can rank by
    /// crypto amount instead when the secondary source is down.
    pub async fn fetch(&self, results: &[QuoteResult]) -> Result<ReferenceRates, ServiceError> {
        let mut rates = HashMap::new();
        for result in results {
            let crypto = result.pair.crypto;
            if rates.contains_key(&crypto) {
                continue;
            }
            let url = format!(
                "{TICKER_BASE}{}{}",
                crypto.as_str(),
                result.pair.fiat.as_str()
            );
            let request = HttpRequest::get(&url).with_header("accept", "application/json");
            let response = self.http.execute(request).await?;
            let ticker: TickerResponse = decode_json(&url, &response)?;
            tracing::debug!(crypto = %crypto, last = ticker.last, "reference rate fetched");
            rates.insert(crypto, ticker.last);
        }
        Ok(ReferenceRates { rates })
    }
}

/// Best value first: ascending market value of the crypto each service
/// asks for.
pub fn rank_by_fiat_value(results: &mut [QuoteResult], rates: &ReferenceRates) {
    results.sort_by(|a, b| rates.fiat_value(a).total_cmp(&rates.fiat_value(b)));
}

/// Groups quotes by crypto symbol, smallest ask first within each group.
/// Needs no secondary source.
pub fn rank_by_crypto_amount(results: &mut [QuoteResult]) {
    results.sort_by(|a, b| {
        a.pair
            .crypto
            .as_str()
            .cmp(b.pair.crypto.as_str())
            .then_with(|| {
                a.conversion
                    .crypto
                    .value()
                    .total_cmp(&b.conversion.crypto.value())
            })
    });
}
