use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration loaded from databricks.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
}

/// Workspace API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Workspace URL, e.g. https://example.cloud.databricks.com
    #[serde(default)]
    pub host: Option<String>,
    /// Personal access token
    #[serde(default)]
    pub token: Option<String>,
    /// Timeout in seconds for API requests
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: None,
            token: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    60
}

/// Name of the config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "databricks.toml";

impl Config {
    /// Load config from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))
    }

    /// Try to load config from databricks.toml in the given directory
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI / environment overrides into the config
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        token: Option<String>,
        timeout: Option<u64>,
    ) -> Self {
        if let Some(h) = host {
            self.api.host = Some(h);
        }
        if let Some(t) = token {
            self.api.token = Some(t);
        }
        if let Some(t) = timeout {
            self.api.timeout_seconds = t;
        }
        self
    }
}

impl ApiConfig {
    /// Host with any trailing slash removed, checked to be an http(s) URL
    pub fn resolved_host(&self) -> Result<String, ConfigError> {
        let host = self
            .host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::MissingHost)?;
        if !host.starts_with("http://") && !host.starts_with("https://") {
            return Err(ConfigError::InvalidHost(host.to_string()));
        }
        Ok(host.trim_end_matches('/').to_string())
    }

    pub fn resolved_token(&self) -> Result<String, ConfigError> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or(ConfigError::MissingToken)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, toml::de::Error),
    #[error("No host configured. Set [api] host in databricks.toml, DATABRICKS_HOST or --host")]
    MissingHost,
    #[error("No token configured. Set [api] token in databricks.toml, DATABRICKS_TOKEN or --token")]
    MissingToken,
    #[error("Host must start with http:// or https://, got '{0}'")]
    InvalidHost(String),
}
