//! Error types for twig_core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using twig_core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during repository operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred during file operations.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Object not found in the store.
    #[error("Object not found: {hash}")]
    ObjectNotFound { hash: String },

    /// Stored object bytes could not be inflated.
    #[error("Corrupt object at {path}: {reason}")]
    CorruptObject { path: PathBuf, reason: String },

    /// Serialized object violates the canonical layout.
    #[error("Malformed object: {reason}")]
    MalformedObject { reason: String },

    /// Invalid digest format or encoding.
    #[error("Invalid digest: {reason}")]
    InvalidHash { reason: String },

    /// Repository is invalid or not initialized.
    #[error("Invalid repository at {path}: {reason}")]
    InvalidStore { path: PathBuf, reason: String },

    /// Typed read found an object of a different kind.
    #[error("Invalid object type: expected {expected}, got {got}")]
    InvalidObjectType { expected: String, got: String },

    /// Invalid tree entry.
    #[error("Invalid tree entry: {reason}")]
    InvalidTreeEntry { reason: String },

    /// Invalid commit identity.
    #[error("Invalid identity: {reason}")]
    InvalidIdentity { reason: String },

    /// Directory recursion guard tripped.
    #[error("Directory nesting exceeds {limit} levels at {path}")]
    DepthLimitExceeded { path: PathBuf, limit: usize },
}

impl Error {
    /// Create an ObjectNotFound error.
    pub fn object_not_found(hash: impl Into<String>) -> Self {
        Error::ObjectNotFound { hash: hash.into() }
    }

    /// Create a CorruptObject error.
    pub fn corrupt_object(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::CorruptObject {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a MalformedObject error.
    pub fn malformed_object(reason: impl Into<String>) -> Self {
        Error::MalformedObject {
            reason: reason.into(),
        }
    }

    /// Create an InvalidHash error.
    pub fn invalid_hash(reason: impl Into<String>) -> Self {
        Error::InvalidHash {
            reason: reason.into(),
        }
    }

    /// Create an InvalidStore error.
    pub fn invalid_store(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::InvalidStore {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidObjectType error.
    pub fn invalid_object_type(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Error::InvalidObjectType {
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Create an InvalidTreeEntry error.
    pub fn invalid_tree_entry(reason: impl Into<String>) -> Self {
        Error::InvalidTreeEntry {
            reason: reason.into(),
        }
    }

    /// Create an InvalidIdentity error.
    pub fn invalid_identity(reason: impl Into<String>) -> Self {
        Error::InvalidIdentity {
            reason: reason.into(),
        }
    }

    /// Create a DepthLimitExceeded error.
    pub fn depth_limit_exceeded(path: impl Into<PathBuf>, limit: usize) -> Self {
        Error::DepthLimitExceeded {
            path: path.into(),
            limit,
        }
    }
}

// Additional From implementations for external error types

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::Io { source: err.error }
    }
}

impl From<ignore::Error> for Error {
    fn from(err: ignore::Error) -> Self {
        // ignore::Error can wrap an io::Error or be a path error
        match err.io_error() {
            Some(io_err) => Error::Io {
                source: std::io::Error::new(io_err.kind(), io_err.to_string()),
            },
            None => Error::Io {
                source: std::io::Error::other(err.to_string()),
            },
        }
    }
}
