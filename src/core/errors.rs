//! JPB-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, JpbError>;

/// The one failure the view core knows about: the data source reported an
/// error instead of records.
///
/// Cloneable so it can ride inside reducer messages and commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    /// Data source that failed (e.g. a file path or "static").
    pub source: String,
    /// Human-readable failure description.
    pub details: String,
}

impl FetchFailure {
    #[must_use]
    pub fn new(source: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            details: details.into(),
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fetching job postings from {}: {}", self.source, self.details)
    }
}

impl std::error::Error for FetchFailure {}

/// Top-level error type for the job posting board.
#[derive(Debug, Error)]
pub enum JpbError {
    #[error("[JPB-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[JPB-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[JPB-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[JPB-2001] {0}")]
    Fetch(FetchFailure),

    #[error("[JPB-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[JPB-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl JpbError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "JPB-1001",
            Self::MissingConfig { .. } => "JPB-1002",
            Self::ConfigParse { .. } => "JPB-1003",
            Self::Fetch(_) => "JPB-2001",
            Self::Serialization { .. } => "JPB-2101",
            Self::Io { .. } => "JPB-3002",
        }
    }

    /// Whether retrying might resolve the failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Io { .. })
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<FetchFailure> for JpbError {
    fn from(value: FetchFailure) -> Self {
        Self::Fetch(value)
    }
}

impl From<serde_json::Error> for JpbError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for JpbError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
