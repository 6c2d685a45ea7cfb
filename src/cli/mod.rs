//! CLI module for catalogdb
//!
//! Provides command-line interface for:
//! - serve: Run the HTTP service over the backing table
//! - init: Create an empty backing table

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
