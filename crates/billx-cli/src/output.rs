use std::collections::BTreeMap;

use billx_core::{
    BillDefinition, BillPayload, PaymentResult, QuoteResult, ReferenceRates, ServiceRegistry,
};

/// One line per quote, cheapest first when reference rates are present.
///
/// With rates the line carries the market value of the asked crypto and
/// the premium over the fiat amount being settled.
pub fn print_quotes(results: &[QuoteResult], rates: Option<&ReferenceRates>) {
    for result in results {
        let service = result.service.as_str();
        let crypto = result.pair.crypto.as_str();
        let asked = result.conversion.crypto.value();
        match rates {
            Some(rates) => {
                let value = rates.fiat_value(result);
                let premium = value / result.conversion.fiat.value() * 100.0 - 100.0;
                println!("{service:<5} {crypto:<9} {asked:>14.5} {value:>12.2} {premium:>8.3}%");
            }
            None => println!("{service:<5} {crypto:<9} {asked:>14.5}"),
        }
    }
}

pub fn print_bills(bills: &BTreeMap<String, BillDefinition>) {
    for (name, bill) in bills {
        match bill.payload() {
            Ok(BillPayload::Bpay(bpay)) => {
                println!("{name:<20} bpay  code {:<8} ref {}", bpay.code, bpay.reference);
            }
            Ok(BillPayload::Eft(eft)) => {
                println!(
                    "{name:<20} eft   bsb {} account {} ({})",
                    eft.bsb, eft.account_number, eft.account_name
                );
            }
            Err(error) => println!("{name:<20} unusable: {error}"),
        }
    }
}

pub fn print_services(registry: &ServiceRegistry) {
    for service in registry.services() {
        let id = service.id();
        let capabilities = service.capabilities();
        let verbs = if capabilities.pay { "quote, pay" } else { "quote" };
        println!("{:<5} {:<24} {verbs}", id.as_str(), id.name());
    }
}

pub fn print_payment(result: &PaymentResult, crypto: &str) {
    println!(
        "send {:.5} {crypto} to {}",
        result.amount.value(),
        result.address
    );
}
