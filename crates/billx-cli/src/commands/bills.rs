use billx_core::{BillDefinition, BillStore, BpayDetails, EftDetails};

use crate::cli::{AddTarget, BillsArgs, BillsCommand, Cli};
use crate::error::CliError;
use crate::output;

pub fn run(args: &BillsArgs, cli: &Cli) -> Result<(), CliError> {
    let store = BillStore::open(&cli.bills_path);
    match &args.command {
        BillsCommand::List => {
            let bills = store.load()?;
            output::print_bills(&bills);
            Ok(())
        }
        BillsCommand::Add(target) => {
            let bill = match target {
                AddTarget::Bpay(args) => BillDefinition::bpay(
                    args.name.clone(),
                    BpayDetails {
                        code: args.code,
                        reference: args.reference.clone(),
                    },
                )?,
                AddTarget::Eft(args) => BillDefinition::eft(
                    args.name.clone(),
                    EftDetails {
                        bsb: args.bsb.clone(),
                        account_number: args.account_number.clone(),
                        account_name: args.account_name.clone(),
                        remitter: args.remitter.clone(),
                    },
                )?,
            };
            let name = bill.name.clone();
            store.add(bill)?;
            println!("saved '{name}'");
            Ok(())
        }
    }
}
