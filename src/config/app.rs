//! Application configuration loading.
//!
//! Settings come from an optional TOML file (`config.toml` by default, or the
//! path in `CONFIG_PATH`) and are then overridden by environment variables:
//! `HOST`, `PORT`, `DATABASE_URL` and `SNAPSHOT_PATH`. A missing file is not an
//! error; every field has a default.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default location of the optional configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Runtime settings for the catalog service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Interface the HTTP server binds to
    pub host: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Connection string for the primary store
    pub database_url: String,
    /// JSON file served when the primary store cannot answer a read
    pub snapshot_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: "sqlite://data/catalog.sqlite?mode=rwc".to_string(),
            snapshot_path: PathBuf::from("data/full-products.json"),
        }
    }
}

impl AppConfig {
    /// Applies overrides from a key lookup (the process environment in production).
    ///
    /// # Errors
    /// Returns `Error::Config` if `PORT` is set but is not a valid port number.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port.parse().map_err(|e| Error::Config {
                message: format!("Invalid PORT '{port}': {e}"),
            })?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(path) = lookup("SNAPSHOT_PATH") {
            self.snapshot_path = PathBuf::from(path);
        }
        Ok(self)
    }

    /// `host:port` string for binding the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads the full application configuration: file (if present), then environment.
///
/// # Errors
/// Returns an error if the config file exists but is invalid, or an environment
/// override cannot be parsed.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let base = if Path::new(&path).exists() {
        info!("Loading configuration file {}", path);
        load_config(&path)?
    } else {
        debug!("No configuration file at {}, using defaults", path);
        AppConfig::default()
    };

    base.with_overrides(|key| std::env::var(key).ok())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
            port = 8080
            snapshot_path = "fixtures/products.json"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.snapshot_path, PathBuf::from("fixtures/products.json"));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.database_url, AppConfig::default().database_url);
    }

    #[test]
    fn test_env_overrides_win() {
        let env: HashMap<&str, &str> = [("PORT", "4000"), ("DATABASE_URL", "sqlite::memory:")]
            .into_iter()
            .collect();
        let config = AppConfig::default()
            .with_overrides(|key| env.get(key).map(ToString::to_string))
            .unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_address(), "0.0.0.0:4000");
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let result = AppConfig::default().with_overrides(|key| {
            (key == "PORT").then(|| "not-a-port".to_string())
        });
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"127.0.0.1\"").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_load_config_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"three thousand\"").unwrap();
        assert!(matches!(load_config(file.path()), Err(Error::Config { .. })));
    }
}
