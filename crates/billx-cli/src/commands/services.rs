use billx_core::ServiceRegistry;

use crate::error::CliError;
use crate::output;

pub fn run(registry: &ServiceRegistry) -> Result<(), CliError> {
    output::print_services(registry);
    Ok(())
}
