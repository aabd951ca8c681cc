//! Application settings. Everything the client needs to reach the API is
//! threaded through [`ClientConfig`] instead of living in a module constant, so
//! tests and alternate deployments can point the client elsewhere.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::Deserialize;
use thiserror::Error;

/// Folder name used beneath the user's home directory for application data.
pub const DATA_DIR_NAME: &str = ".bookstore-admin";
/// Settings file stored inside the application data directory.
const CONFIG_FILE_NAME: &str = "config.toml";
/// Log file stored inside the application data directory.
const LOG_FILE_NAME: &str = "admin.log";
/// Service used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.isbndb.com";
/// Environment variable that overrides the configured base URL.
pub const BASE_URL_ENV: &str = "BOOKSTORE_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not locate home directory")]
    NoHome,
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Connection settings for the catalog API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Target service, e.g. `https://catalog.example.com/api`.
    pub base_url: String,
    /// Extra headers attached to every request. `Content-Type` defaults to
    /// `application/json`.
    pub headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headers: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ClientConfig,
    /// Delay before a typed search term is applied. Zero filters on every
    /// keystroke.
    pub search_debounce_ms: u64,
    /// Where log output goes. Defaults to `admin.log` in the data directory.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ClientConfig::default(),
            search_debounce_ms: 0,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Load the settings file at `path`, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw, path)
    }

    /// Load from an explicit path when given, otherwise from the data
    /// directory.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&data_dir()?.join(CONFIG_FILE_NAME)),
        }
    }

    fn parse(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply a base URL override. Blank values are ignored.
    pub fn override_base_url(&mut self, base_url: Option<String>) {
        if let Some(url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
    }

    /// Resolve the log file path, falling back to the data directory.
    pub fn log_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(LOG_FILE_NAME)),
        }
    }
}

/// Absolute path to the application data directory inside the user's home.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHome)?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn reads_api_table_and_headers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
search_debounce_ms = 300

[api]
base_url = "http://localhost:8080"

[api.headers]
X-Tenant = "north"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.headers.get("X-Tenant").map(String::as_str), Some("north"));
        assert_eq!(config.search_debounce_ms, 300);
    }

    #[test]
    fn malformed_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api = 12").unwrap();
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn blank_override_is_ignored() {
        let mut config = AppConfig::default();
        config.override_base_url(Some("   ".into()));
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        config.override_base_url(Some(" http://api.local ".into()));
        assert_eq!(config.api.base_url, "http://api.local");
    }
}
