//! Status command implementation.

use crate::cli::StatusArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the status command.
pub fn execute_status(args: StatusArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = config.master_store(args.store);
    if !store.exists() {
        println!(
            "{}",
            formatter.warning(&format!("No master file at {}", store.path().display()))
        );
        return Ok(());
    }

    let records = store.load()?;
    println!("{}", formatter.format_records(&records)?);
    Ok(())
}
