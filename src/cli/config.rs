//! Service configuration
//!
//! Loaded from an optional JSON file. Every field has a default, so
//! `{}` (or no file at all) is a valid configuration:
//!
//! ```json
//! {
//!   "data_file": "./data/products.csv",
//!   "serialize_writes": true,
//!   "host": "0.0.0.0",
//!   "port": 3000,
//!   "cors_origins": []
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::catalog::StoreOptions;
use crate::http_server::HttpServerConfig;

/// Service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backing table path
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Serialize mutations on a per-file lock
    #[serde(default = "default_serialize_writes")]
    pub serialize_writes: bool,

    /// HTTP listener settings
    #[serde(flatten)]
    pub http: HttpServerConfig,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./data/products.csv")
}

fn default_serialize_writes() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            serialize_writes: default_serialize_writes(),
            http: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn resolve(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply command-line overrides and re-validate
    pub fn with_overrides(mut self, port: Option<u16>, data_file: Option<PathBuf>) -> CliResult<Self> {
        if let Some(port) = port {
            self.http.port = port;
        }
        if let Some(data_file) = data_file {
            self.data_file = data_file;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(CliError::config_error("data_file must not be empty"));
        }

        if self.data_file.is_dir() {
            return Err(CliError::config_error(format!(
                "data_file {} is a directory",
                self.data_file.display()
            )));
        }

        if self.http.host.trim().is_empty() {
            return Err(CliError::config_error("host must not be empty"));
        }

        Ok(())
    }

    /// Store options derived from this configuration
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            serialize_writes: self.serialize_writes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("catalogdb.json");
        fs::write(&config_path, "{}").unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.data_file, PathBuf::from("./data/products.csv"));
        assert!(config.serialize_writes);
        assert_eq!(config.http.port, 3000);
    }

    #[test]
    fn test_config_flattened_http_fields() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("catalogdb.json");
        let config = json!({
            "data_file": temp_dir.path().join("p.csv").to_string_lossy(),
            "serialize_writes": false,
            "port": 8081,
            "cors_origins": ["http://localhost:5173"]
        });
        fs::write(&config_path, config.to_string()).unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.http.port, 8081);
        assert_eq!(config.http.cors_origins.len(), 1);
        assert!(!config.store_options().serialize_writes);
    }

    #[test]
    fn test_config_rejects_directory_data_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("catalogdb.json");
        let config = json!({ "data_file": temp_dir.path().to_string_lossy() });
        fs::write(&config_path, config.to_string()).unwrap();

        assert!(Config::load(&config_path).is_err());
    }

    #[test]
    fn test_config_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Config::load(&temp_dir.path().join("absent.json")).is_err());
        assert_eq!(Config::resolve(None).unwrap(), Config::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::default()
            .with_overrides(Some(9999), Some(PathBuf::from("other.csv")))
            .unwrap();
        assert_eq!(config.http.port, 9999);
        assert_eq!(config.data_file, PathBuf::from("other.csv"));
    }
}
