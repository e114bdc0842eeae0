//! Error types for bundle generation

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while building a bundle
///
/// Every variant aborts the whole build; no partial bundle is ever returned.
#[derive(Debug, Error)]
pub enum BundleError {
    /// Root directory is missing or is not a directory
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// Basic-auth string is not of the form `user:password`
    #[error("Invalid form of basic auth credentials: {0}")]
    InvalidCredentialsFormat(String),

    /// File name that cannot be represented as a UTF-8 mount path
    #[error("File name is not valid UTF-8: {0}")]
    InvalidFileName(PathBuf),

    /// Listing a directory or reading a file failed
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Gzip encoding or decoding failed
    #[error("Compression failed: {0}")]
    Compression(#[source] std::io::Error),

    /// Embedded payload is not valid base64
    #[error("Invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Configuration file could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BundleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BundleError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, BundleError>;
