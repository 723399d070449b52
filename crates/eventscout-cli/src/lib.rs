//! eventscout CLI library.
//!
//! Command-line front end for the security-event review pipeline: argument
//! parsing, configuration loading, the operator prompt, and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod confirm;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use confirm::PromptConfirmation;
pub use error::{CliError, Result};
pub use output::Formatter;
