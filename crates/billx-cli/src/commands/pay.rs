use std::str::FromStr;
use std::sync::Arc;

use billx_core::{
    BillStore, Currency, PaymentOrchestrator, PaymentRequest, ServiceId, ServiceRegistry,
};

use crate::cli::{Cli, PayArgs};
use crate::error::CliError;
use crate::output;

pub async fn run(
    args: &PayArgs,
    cli: &Cli,
    registry: Arc<ServiceRegistry>,
) -> Result<(), CliError> {
    let fiat = Currency::resolve(&args.fiat)?;
    let crypto = Currency::resolve(&args.crypto)?;
    let service = ServiceId::from_str(&args.service)?;
    let request = PaymentRequest::new(args.amount, fiat, crypto, service, args.auth.clone())?;

    let bill = BillStore::open(&cli.bills_path).get(&args.name)?;

    let result = PaymentOrchestrator::new(registry).pay(&request, &bill).await?;
    output::print_payment(&result, crypto.as_str());
    Ok(())
}
