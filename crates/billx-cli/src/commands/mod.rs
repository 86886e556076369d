mod bills;
mod pay;
mod quote;
mod services;
mod verify;

use std::sync::Arc;

use billx_core::{HttpClient, ReqwestHttpClient, ServiceRegistry};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let registry = Arc::new(ServiceRegistry::standard(http.clone()));

    match &cli.command {
        Command::Quote(args) => quote::run(args, cli, http, registry).await,
        Command::Bills(args) => bills::run(args, cli),
        Command::Pay(args) => pay::run(args, cli, registry).await,
        Command::Services => services::run(&registry),
        Command::Verify(args) => verify::run(args, http).await,
    }
}
