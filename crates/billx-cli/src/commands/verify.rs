use std::sync::Arc;

use billx_core::{HttpClient, PaidByCoinsAdapter};

use crate::cli::VerifyArgs;
use crate::error::CliError;

pub async fn run(args: &VerifyArgs, http: Arc<dyn HttpClient>) -> Result<(), CliError> {
    let adapter = PaidByCoinsAdapter::new(http);
    match &args.pin {
        Some(pin) => {
            adapter.verify_pin(&args.email, pin).await?;
            println!("{} verified", args.email);
        }
        None => {
            if adapter.verify_email(&args.email).await? {
                println!("{} is already verified", args.email);
            } else {
                println!("verification pin sent; rerun with --pin once it arrives");
            }
        }
    }
    Ok(())
}
