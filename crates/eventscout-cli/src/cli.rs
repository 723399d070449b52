//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// eventscout - Suggest new security event logs from specification PDFs.
#[derive(Debug, Parser)]
#[command(name = "eventscout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "EVENTSCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (names only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze every new document in the source directory
    Run(RunArgs),

    /// Write the CSV reports from the master file
    Export(ExportArgs),

    /// List the documents already in the master file
    Status(StatusArgs),
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Directory holding the PDFs
    #[arg(short, long, env = "EVENTSCOUT_SOURCE")]
    pub source: Option<PathBuf>,

    /// Master JSON file
    #[arg(long, env = "EVENTSCOUT_STORE")]
    pub store: Option<PathBuf>,

    /// Skip the confirmation prompt when the master file is missing
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Stop at the first document that fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Treat a document as processed only on an exact name match
    #[arg(long)]
    pub exact_match: bool,
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Master JSON file
    #[arg(long, env = "EVENTSCOUT_STORE")]
    pub store: Option<PathBuf>,

    /// Directory the CSV files are written to
    #[arg(short, long, env = "EVENTSCOUT_OUT_DIR")]
    pub out_dir: Option<PathBuf>,
}

/// Arguments for the status command.
#[derive(Debug, Parser)]
pub struct StatusArgs {
    /// Master JSON file
    #[arg(long, env = "EVENTSCOUT_STORE")]
    pub store: Option<PathBuf>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
