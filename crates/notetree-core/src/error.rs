//! Error types for the rename engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::progress::RenameIssue;

/// Errors surfaced by the vault storage layer.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The rename target is already occupied.
    #[error("File already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// The directory still has entries.
    #[error("Directory not empty: {path}")]
    NotEmpty { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl VaultError {
    /// Classify an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Engine-fatal errors.
///
/// Everything else the engine encounters travels as [`RenameIssue`] data:
/// per-file failures never abort a transaction, and reversal failures never
/// abort a compensation pass.
#[derive(Debug, Error)]
pub enum RenameError {
    /// The transaction was cancelled. Compensation has already run by the
    /// time this is returned; its failures, if any, are embedded here.
    #[error("Rename cancelled: {reverted} rename(s) rolled back{}", format_compensation(.compensation_errors))]
    Cancelled {
        /// Number of already-applied renames that were reverted.
        reverted: usize,
        /// Reversal failures collected during compensation.
        compensation_errors: Vec<RenameIssue>,
    },
}

fn format_compensation(errors: &[RenameIssue]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let list = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    format!(" (rollback errors: {list})")
}
