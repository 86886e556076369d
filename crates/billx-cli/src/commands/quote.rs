use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use billx_core::{
    ranking, CrossRateIndex, Currency, HttpClient, QuoteAggregator, QuoteOutcome, QuoteRequest,
    ServiceId, ServiceRegistry,
};

use crate::cli::{Cli, QuoteArgs};
use crate::error::CliError;
use crate::output;

pub async fn run(
    args: &QuoteArgs,
    cli: &Cli,
    http: Arc<dyn HttpClient>,
    registry: Arc<ServiceRegistry>,
) -> Result<(), CliError> {
    let fiat = Currency::resolve(&args.fiat)?;
    let request = QuoteRequest::new(args.amount, fiat)?;

    let filter = args
        .filter
        .iter()
        .map(|symbol| Currency::resolve(symbol))
        .collect::<Result<Vec<_>, _>>()?;

    let registry = if args.services.is_empty() {
        registry
    } else {
        let wanted = args
            .services
            .iter()
            .map(|code| ServiceId::from_str(code))
            .collect::<Result<Vec<_>, _>>()?;
        Arc::new(registry.subset(&wanted))
    };

    let aggregator = QuoteAggregator::new(registry)
        .with_call_timeout(Duration::from_millis(cli.timeout_ms));
    let QuoteOutcome { mut results, errors } = aggregator.quote(&request).await;

    if let Some(errors) = errors {
        if results.is_empty() {
            return Err(CliError::NoQuotes(errors));
        }
        for failure in errors.failures() {
            eprintln!("warning: {}: {}", failure.service, failure.error);
        }
    }

    ranking::retain_supported(&mut results);
    if !filter.is_empty() {
        results.retain(|result| filter.contains(&result.pair.crypto));
    }

    if args.no_convert_back {
        ranking::rank_by_crypto_amount(&mut results);
        output::print_quotes(&results, None);
    } else {
        let rates = CrossRateIndex::new(http).fetch(&results).await?;
        ranking::rank_by_fiat_value(&mut results, &rates);
        output::print_quotes(&results, Some(&rates));
    }

    Ok(())
}
