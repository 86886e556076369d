mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    if let Err(error) = commands::run(&cli).await {
        eprintln!("error: {error}");
        std::process::exit(error.exit_code());
    }
}

/// Diagnostics go to stderr so stdout stays parseable.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("billx_core=warn,billx=warn")),
        )
        .init();
}
