//! Export command implementation.

use crate::cli::ExportArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use eventscout_report::{ExportSummary, ReportExporter};

/// Execute the export command.
pub fn execute_export(args: ExportArgs, config: &Config, formatter: &Formatter) -> Result<ExportSummary> {
    let store = config.master_store(args.store);
    let exporter = ReportExporter::new(args.out_dir.unwrap_or_else(|| config.report.out_dir.clone()));

    let summary = exporter.export(&store)?;
    println!("{}", formatter.export_summary(&summary, &exporter));
    Ok(summary)
}
