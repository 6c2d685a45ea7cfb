//! CLI command implementations

use std::path::{Path, PathBuf};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use crate::catalog::{table, ProductStore};
use crate::http_server::HttpServer;
use crate::observability::{Event, Logger};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Dispatch a parsed command
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            config,
            port,
            data_file,
        } => serve(config.as_deref(), port, data_file),
        Command::Init { config, data_file } => init(config.as_deref(), data_file),
    }
}

/// Create a header-only backing table.
///
/// Refuses to touch an existing table.
pub fn init(config_path: Option<&Path>, data_file: Option<PathBuf>) -> CliResult<()> {
    let config = load_config(config_path, None, data_file)?;

    if config.data_file.exists() {
        return Err(CliError::already_initialized(&config.data_file));
    }

    table::ensure_exists(&config.data_file)?;

    let path = config.data_file.display().to_string();
    Logger::event(Event::TableInitialized, &[("data_file", path.as_str())]);
    Ok(())
}

/// Serve the catalog over HTTP until interrupted
pub fn serve(
    config_path: Option<&Path>,
    port: Option<u16>,
    data_file: Option<PathBuf>,
) -> CliResult<()> {
    let config = load_config(config_path, port, data_file)?;
    let store = ProductStore::open(config.data_file.clone(), config.store_options());

    // Fail fast on an unreadable or corrupt table
    store.load()?;

    let server = HttpServer::with_config(config.http.clone(), store);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

fn load_config(
    config_path: Option<&Path>,
    port: Option<u16>,
    data_file: Option<PathBuf>,
) -> CliResult<Config> {
    let config = Config::resolve(config_path)?.with_overrides(port, data_file)?;

    let data_file = config.data_file.display().to_string();
    let port = config.http.port.to_string();
    let serialize_writes = config.serialize_writes.to_string();
    Logger::event(
        Event::ConfigLoaded,
        &[
            ("data_file", data_file.as_str()),
            ("port", port.as_str()),
            ("serialize_writes", serialize_writes.as_str()),
        ],
    );

    Ok(config)
}
