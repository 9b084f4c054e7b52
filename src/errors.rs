//! Error taxonomy
//!
//! Per-file conditions (`ExtractError`) and per-batch conditions
//! (`ProviderError`) are recovered by the caller. Registry and configuration
//! failures abort the run.

use std::path::PathBuf;
use thiserror::Error;

/// Recoverable per-file failure
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No extractor registered for the file's extension
    #[error("no extractor registered for extension '{extension}'")]
    NotSupported { extension: String },

    /// Malformed source, unreadable content, or traversal failure
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// The grammar could not be loaded into a parser
    #[error("{language} grammar unavailable: {message}")]
    Grammar { language: String, message: String },
}

impl ExtractError {
    pub fn is_not_supported(&self) -> bool {
        matches!(self, ExtractError::NotSupported { .. })
    }
}

/// Fatal registration failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("language '{language}' is already registered")]
    DuplicateLanguage { language: String },

    #[error("language '{language}' was registered without any extensions")]
    EmptyExtensions { language: String },

    #[error("invalid extension '{extension}' for language '{language}'")]
    InvalidExtension { language: String, extension: String },
}

/// Text generation failure; the affected batch is discarded
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {provider} failed: {source}")]
    Request {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned status {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("invalid response from {provider}: {message}")]
    InvalidResponse { provider: String, message: String },

    #[error("no API key configured for {provider} (set llm.api_key or {env_var})")]
    MissingApiKey { provider: String, env_var: String },

    #[error("unknown text generation provider '{name}'")]
    UnknownProvider { name: String },
}

/// Fatal configuration failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
