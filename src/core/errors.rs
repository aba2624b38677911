//! FWP-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, WipeError>;

/// Top-level error type for the file wiper.
///
/// Only [`WipeError::Listing`] is fatal: it aborts the entire wipe
/// operation. Every other category is contained at the node or pass
/// level and recorded without stopping the traversal.
#[derive(Debug, Error)]
pub enum WipeError {
    #[error("[FWP-1001] invalid wipe target: {details}")]
    InvalidTarget { details: String },

    #[error("[FWP-1002] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[FWP-1003] invalid overwrite pattern: {details}")]
    InvalidPattern { details: String },

    #[error("[FWP-2001] node unexpectedly missing: {path}")]
    MissingNode { path: PathBuf },

    #[error("[FWP-2002] permission denied for {path}")]
    PermissionDenied { path: PathBuf },

    #[error("[FWP-2003] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[FWP-2004] unable to list directory {path}: {details}")]
    Listing { path: PathBuf, details: String },

    #[error("[FWP-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[FWP-3900] unexpected failure: {details}")]
    Unexpected { details: String },
}

impl WipeError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidTarget { .. } => "FWP-1001",
            Self::ConfigParse { .. } => "FWP-1002",
            Self::InvalidPattern { .. } => "FWP-1003",
            Self::MissingNode { .. } => "FWP-2001",
            Self::PermissionDenied { .. } => "FWP-2002",
            Self::Io { .. } => "FWP-2003",
            Self::Listing { .. } => "FWP-2004",
            Self::Serialization { .. } => "FWP-2101",
            Self::Unexpected { .. } => "FWP-3900",
        }
    }

    /// Whether this failure aborts the whole wipe operation.
    ///
    /// Listing failures are the single fatal category; everything else
    /// skips the affected pass or node and the traversal continues.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Listing { .. })
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Categorize a raw `io::Error` observed while operating on `path`.
    ///
    /// `NotFound` means the node vanished between listing and operation;
    /// `PermissionDenied` is its own category; anything else stays a
    /// generic IO failure carrying the source error.
    #[must_use]
    pub fn from_io_kind(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match source.kind() {
            ErrorKind::NotFound => Self::MissingNode { path },
            ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }
}

impl From<toml::de::Error> for WipeError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for WipeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}
