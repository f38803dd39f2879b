//! Output format for commands that print remote resources

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How read commands print their result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable columns
    #[default]
    Text,
    /// Pretty printed JSON, as returned by the API
    Json,
    /// YAML
    Yaml,
}

impl OutputFormat {
    /// Render a value for the structured formats. Returns None for `Text`,
    /// where each command prints its own columns.
    pub fn render<T: Serialize>(&self, value: &T) -> Result<Option<String>, OutputError> {
        match self {
            OutputFormat::Text => Ok(None),
            OutputFormat::Json => Ok(Some(serde_json::to_string_pretty(value)?)),
            OutputFormat::Yaml => Ok(Some(serde_yaml::to_string(value)?)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
