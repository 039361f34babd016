//! Error types for destination parsing and configuration

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IgnoreError>;

/// Errors raised around the matcher.
///
/// Rule matching itself never fails; a rule that cannot be parsed simply
/// does not match.
#[derive(Debug, Error)]
pub enum IgnoreError {
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("No default port known for scheme: {scheme}")]
    UnknownScheme { scheme: String },

    #[error("Failed to load config from {path}: {source}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
