//! Error types for the fnav core.
//!
//! Every fallible listing or filesystem operation returns a [ListingError].
//! Variants carry the [Operation] and the path involved so the driver can show
//! a message without having to know where the failure came from.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The filesystem operation a [ListingError] was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Stat,
    List,
    Delete,
    Copy,
    Move,
    MakeDirectory,
    Navigate,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Stat => "stat",
            Operation::List => "list",
            Operation::Delete => "delete",
            Operation::Copy => "copy",
            Operation::Move => "move",
            Operation::MakeDirectory => "mkdir",
            Operation::Navigate => "open",
        };
        f.write_str(s)
    }
}

/// The error taxonomy of the listing engine.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("{op} '{}': no such file or directory", .path.display())]
    NotFound { op: Operation, path: PathBuf },

    #[error("{op} '{}': permission denied", .path.display())]
    PermissionDenied { op: Operation, path: PathBuf },

    #[error("{op} '{}': already exists", .path.display())]
    AlreadyExists { op: Operation, path: PathBuf },

    /// The destination cannot receive the current selection, e.g. several
    /// selected items against a single file path.
    #[error("invalid destination '{}': {reason}", .path.display())]
    InvalidDestination { path: PathBuf, reason: String },

    #[error("{op} '{}': unsupported entry type", .path.display())]
    UnsupportedEntryType { op: Operation, path: PathBuf },

    #[error("'{}' is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("invalid filter: {0}")]
    InvalidFilter(#[from] regex::Error),

    #[error("{op} '{}': {source}", .path.display())]
    Io {
        op: Operation,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A batch operation finished with some failed items.
    #[error("{completed} done, {} failed: {}", .failures.len(), first_message(.failures))]
    Partial {
        completed: usize,
        failures: Vec<ListingError>,
    },
}

fn first_message(failures: &[ListingError]) -> String {
    failures
        .first()
        .map(|e| e.to_string())
        .unwrap_or_default()
}

impl ListingError {
    /// Maps an I/O error onto the taxonomy, keeping the raw error for any
    /// kind that has no dedicated variant.
    pub fn from_io(op: Operation, path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => ListingError::NotFound { op, path },
            io::ErrorKind::PermissionDenied => ListingError::PermissionDenied { op, path },
            io::ErrorKind::AlreadyExists => ListingError::AlreadyExists { op, path },
            _ => ListingError::Io {
                op,
                path,
                source: err,
            },
        }
    }

    pub(crate) fn invalid_destination(path: &Path, reason: impl Into<String>) -> Self {
        ListingError::InvalidDestination {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// The path the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ListingError::NotFound { path, .. }
            | ListingError::PermissionDenied { path, .. }
            | ListingError::AlreadyExists { path, .. }
            | ListingError::InvalidDestination { path, .. }
            | ListingError::UnsupportedEntryType { path, .. }
            | ListingError::NotADirectory { path }
            | ListingError::Io { path, .. } => Some(path),
            ListingError::InvalidFilter(_) | ListingError::Partial { .. } => None,
        }
    }
}

/// Result alias used throughout the core.
pub type Result<T, E = ListingError> = std::result::Result<T, E>;
