//! CLI argument definitions for billx.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `quote` | Compare crypto quotes for a fiat amount across services |
//! | `bills` | List or save bill definitions |
//! | `pay` | Pay a saved bill with crypto through one service |
//! | `services` | List registered services and their capabilities |
//! | `verify` | Verify an email address with the payment service |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--bills-path` | `bills.json` | Where the saved-bill file lives |
//! | `--timeout-ms` | `10000` | Deadline per service call in ms |
//!
//! # Examples
//!
//! ```bash
//! # Compare BTC/ETH quotes for a $1000 AUD bill
//! billx quote 1000 aud --filter btc,eth
//!
//! # Save a BPAY bill, then pay it with BTC
//! billx bills add bpay power 93880 5461497013987
//! billx pay power 150 aud btc pbc --auth me@example.com
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// billx - Pay Australian bills with cryptocurrency
///
/// Compare fiat-to-crypto quotes across payment services and settle
/// BPAY or direct-deposit bills through the cheapest one.
#[derive(Debug, Parser)]
#[command(
    name = "billx",
    version,
    about = "Compare and pay Australian bills with cryptocurrency",
    long_about = "billx compares what a fiat bill costs in cryptocurrency across several \
payment services and can settle BPAY or direct-deposit bills through one of them.\n\
\n\
  • Quote comparison across Living Room of Satoshi, Paid By Coins and Bit2Bill\n\
  • Quotes valued at the market cross rate so services can be ranked fairly\n\
  • Saved-bill address book for repeat payments\n\
\n\
Use 'billx <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Where the saved-bill file lives.
    #[arg(long, global = true, default_value = "bills.json")]
    pub bills_path: PathBuf,

    /// Deadline for each service call, in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ask every service what a fiat amount costs in crypto.
    Quote(QuoteArgs),

    /// Manage the saved-bill file.
    Bills(BillsArgs),

    /// Pay a saved bill with crypto through one service.
    Pay(PayArgs),

    /// List the registered services and what each can do.
    Services,

    /// Verify an email address with the payment service.
    Verify(VerifyArgs),
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Fiat amount to settle, e.g. 1000.
    pub amount: f64,

    /// Fiat currency the amount is in, e.g. AUD.
    pub fiat: String,

    /// Only show these cryptocurrencies, e.g. btc,eth.
    #[arg(long, value_delimiter = ',')]
    pub filter: Vec<String>,

    /// Only ask these services, e.g. lros,b2b.
    #[arg(long, value_delimiter = ',')]
    pub services: Vec<String>,

    /// Rank by coin and asked amount instead of valuing each quote at
    /// the market rate. Skips the extra rate lookup.
    #[arg(long)]
    pub no_convert_back: bool,
}

#[derive(Debug, Args)]
pub struct BillsArgs {
    #[command(subcommand)]
    pub command: BillsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BillsCommand {
    /// Show every saved bill.
    List,

    /// Save a bill for later payment.
    #[command(subcommand)]
    Add(AddTarget),
}

#[derive(Debug, Subcommand)]
pub enum AddTarget {
    /// Save a BPAY bill, e.g. billx bills add bpay power 93880 5461497013987.
    Bpay(AddBpayArgs),

    /// Save a direct-deposit bill.
    Eft(AddEftArgs),
}

#[derive(Debug, Args)]
pub struct AddBpayArgs {
    /// Name to save the bill under.
    pub name: String,

    /// BPAY biller code.
    pub code: u32,

    /// Customer reference number.
    pub reference: String,
}

#[derive(Debug, Args)]
pub struct AddEftArgs {
    /// Name to save the bill under.
    pub name: String,

    /// BSB of the receiving account, e.g. 062-692.
    pub bsb: String,

    /// Receiving account number.
    pub account_number: String,

    /// Receiving account name.
    pub account_name: String,

    /// Statement text shown to the receiving account.
    #[arg(long)]
    pub remitter: Option<String>,
}

#[derive(Debug, Args)]
pub struct PayArgs {
    /// Saved bill to pay.
    pub name: String,

    /// Fiat amount to settle.
    pub amount: f64,

    /// Fiat currency, e.g. AUD.
    pub fiat: String,

    /// Cryptocurrency to pay with, e.g. BTC.
    pub crypto: String,

    /// Service to pay through, e.g. pbc.
    pub service: String,

    /// Email address registered with the service.
    #[arg(long)]
    pub auth: String,
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Email address to verify.
    pub email: String,

    /// Pin the service mailed out; omit to check the current status.
    #[arg(long)]
    pub pin: Option<String>,
}
