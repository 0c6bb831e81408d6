use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum PlugError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Plugin '{0}' is not installed")]
    NotInstalled(String),

    #[error("Plugin Metadata Error: {0}")]
    PluginMetadata(String),

    #[error("API Error: {0}")]
    Api(String),

    #[error("Resource Not Found: {0}")]
    NotFound(String),

    #[error("HttpError: {0}")]
    HttpError(String),

    #[error("DownloadError: Failed to download '{0}' from '{1}': {2}")]
    DownloadError(String, String, String),

    #[error("Checksum Error: {0}")]
    ChecksumError(String),

    #[error("Removal Error: {0}")]
    Removal(String),

    #[error("Installation Error: {0}")]
    InstallError(String),

    #[error("Validation Error: {0}")]
    ValidationError(String),

    #[error("Generic Error: {0}")]
    Generic(String),
}

impl From<std::io::Error> for PlugError {
    fn from(err: std::io::Error) -> Self {
        PlugError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for PlugError {
    fn from(err: reqwest::Error) -> Self {
        PlugError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for PlugError {
    fn from(err: serde_json::Error) -> Self {
        PlugError::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, PlugError>;
