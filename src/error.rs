//! Error types for playerscore
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias using ScoreError
pub type Result<T> = std::result::Result<T, ScoreError>;

/// Unified error type for playerscore operations
#[derive(Debug, Error)]
pub enum ScoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Store Construction Errors
    // -------------------------------------------------------------------------
    #[error("Failed to open score database at {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: redb::DatabaseError,
    },

    #[error("Timed out after {waited:?} waiting for the lock on {}", path.display())]
    OpenTimeout { path: PathBuf, waited: Duration },

    #[error("Namespace {namespace:?} unavailable: {source}")]
    Namespace {
        namespace: &'static str,
        #[source]
        source: redb::Error,
    },

    // -------------------------------------------------------------------------
    // Per-call Store Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read score for {name:?}: {source}")]
    Read {
        name: String,
        #[source]
        source: redb::Error,
    },

    #[error("Failed to record win for {name:?}: {source}")]
    Write {
        name: String,
        #[source]
        source: redb::Error,
    },

    #[error("Failed to scan namespace {namespace:?}: {source}")]
    Scan {
        namespace: &'static str,
        #[source]
        source: redb::Error,
    },

    #[error("Stored score is {len} bytes, expected 4")]
    CorruptScore { len: usize },

    #[error("Score for {name:?} is already at the maximum of {}", u32::MAX)]
    ScoreOverflow { name: String },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScoreError {
    pub(crate) fn read(name: &str, source: impl Into<redb::Error>) -> Self {
        Self::Read {
            name: name.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn scan(namespace: &'static str, source: impl Into<redb::Error>) -> Self {
        Self::Scan {
            namespace,
            source: source.into(),
        }
    }

    pub(crate) fn namespace(namespace: &'static str, source: impl Into<redb::Error>) -> Self {
        Self::Namespace {
            namespace,
            source: source.into(),
        }
    }

    pub(crate) fn write(name: &str, source: impl Into<redb::Error>) -> Self {
        Self::Write {
            name: name.to_string(),
            source: source.into(),
        }
    }
}
