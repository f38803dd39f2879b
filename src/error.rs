use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{ConfigError, OutputError, ValidationError};

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum DatabricksError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid arguments: {0}")]
    Validation(#[from] ValidationError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid DBFS path '{0}': expected an absolute path such as dbfs:/tmp/file")]
    InvalidPath(String),

    #[error("Exactly one of source and destination must be a dbfs: path (got '{src}' and '{dst}')")]
    AmbiguousCopy { src: String, dst: String },

    #[error("{0} is a directory")]
    IsDirectory(String),

    #[error("Local file not found: {0}")]
    LocalFileNotFound(PathBuf),

    #[error("Local file already exists: {0} (use --overwrite)")]
    LocalFileExists(PathBuf),

    #[error("File too large for a single put: {path} is {size} bytes (max: {max}). Use 'fs cp' instead")]
    FileTooLarge { path: PathBuf, size: u64, max: usize },

    #[error("Failed to get user input: {0}")]
    Prompt(String),

    #[error("Aborted by user")]
    Aborted,
}

/// Errors returned by the REST API or the transport under it
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP {status}{}: {message}", code_suffix(.error_code))]
    Http {
        status: u16,
        error_code: Option<String>,
        message: String,
    },

    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

fn code_suffix(error_code: &Option<String>) -> String {
    error_code
        .as_deref()
        .map(|c| format!(" {}", c))
        .unwrap_or_default()
}

/// Error body the service sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    /// Build an HTTP error from a non-2xx status and its raw body. The
    /// service's `{"error_code", "message"}` body is unpacked when present,
    /// otherwise the body text is kept as the message.
    pub fn from_status(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody { error_code, message: Some(message) }) => ApiError::Http {
                status,
                error_code,
                message,
            },
            Ok(ErrorBody { error_code: Some(code), message: None }) => ApiError::Http {
                status,
                error_code: Some(code),
                message: body.trim().to_string(),
            },
            _ => ApiError::Http {
                status,
                error_code: None,
                message: body.trim().to_string(),
            },
        }
    }

    /// HTTP status of the failed call, if it got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            ApiError::Http { status, error_code, .. } => {
                *status == 404 || error_code.as_deref() == Some("RESOURCE_DOES_NOT_EXIST")
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(0)
        } else if err.is_connect() {
            ApiError::ConnectionRefused(err.to_string())
        } else if err.is_decode() {
            ApiError::ParseError(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Http {
                status: status.as_u16(),
                error_code: None,
                message: err.to_string(),
            }
        } else {
            ApiError::RequestFailed(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, DatabricksError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_unpacks_service_error() {
        let body = r#"{"error_code":"RESOURCE_DOES_NOT_EXIST","message":"No file or directory exists on path /missing."}"#;
        let err = ApiError::from_status(404, body);
        match &err {
            ApiError::Http { status, error_code, message } => {
                assert_eq!(*status, 404);
                assert_eq!(error_code.as_deref(), Some("RESOURCE_DOES_NOT_EXIST"));
                assert_eq!(message, "No file or directory exists on path /missing.");
            }
            other => panic!("Expected Http error, got {:?}", other),
        }
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "HTTP 404 RESOURCE_DOES_NOT_EXIST: No file or directory exists on path /missing."
        );
    }

    #[test]
    fn test_from_status_keeps_raw_body() {
        let err = ApiError::from_status(502, "<html>Bad Gateway</html>\n");
        match &err {
            ApiError::Http { status, error_code, message } => {
                assert_eq!(*status, 502);
                assert!(error_code.is_none());
                assert_eq!(message, "<html>Bad Gateway</html>");
            }
            other => panic!("Expected Http error, got {:?}", other),
        }
        assert_eq!(err.to_string(), "HTTP 502: <html>Bad Gateway</html>");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_from_status_code_without_message() {
        let body = r#"{"error_code":"INVALID_PARAMETER_VALUE"}"#;
        let err = ApiError::from_status(400, body);
        match err {
            ApiError::Http { error_code, message, .. } => {
                assert_eq!(error_code.as_deref(), Some("INVALID_PARAMETER_VALUE"));
                assert_eq!(message, body);
            }
            other => panic!("Expected Http error, got {:?}", other),
        }
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(ApiError::from_status(403, "denied").status(), Some(403));
        assert_eq!(ApiError::Timeout(30).status(), None);
    }

    #[test]
    fn test_error_wrapping_display() {
        let err: DatabricksError = ApiError::from_status(500, "boom").into();
        assert_eq!(err.to_string(), "API error: HTTP 500: boom");

        let err: DatabricksError = ValidationError::TaskRequired.into();
        assert!(err.to_string().starts_with("Invalid arguments: Specify exactly one task"));
    }
}
