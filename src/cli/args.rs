//! CLI argument definitions using clap
//!
//! Commands:
//! - catalogdb serve [--config <path>] [--port <port>] [--data-file <path>]
//! - catalogdb init [--config <path>] [--data-file <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// catalogdb - a product catalog served over HTTP from one CSV file
#[derive(Parser, Debug)]
#[command(name = "catalogdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on, overriding the configuration file
        #[arg(long)]
        port: Option<u16>,

        /// Backing table, overriding the configuration file
        #[arg(long)]
        data_file: Option<PathBuf>,
    },

    /// Create an empty backing table
    Init {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Backing table, overriding the configuration file
        #[arg(long)]
        data_file: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["catalogdb", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Command::Serve { port, config, .. } => {
                assert_eq!(port, Some(8080));
                assert!(config.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_init_data_file() {
        let cli = Cli::try_parse_from(["catalogdb", "init", "--data-file", "x.csv"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Init { data_file: Some(ref p), .. } if p == &PathBuf::from("x.csv")
        ));
    }
}
