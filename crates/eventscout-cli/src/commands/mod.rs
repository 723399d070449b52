//! Command implementations.

pub mod export;
pub mod run;
pub mod status;

pub use self::export::execute_export;
pub use self::run::{execute_run, run_processor};
pub use self::status::execute_status;
