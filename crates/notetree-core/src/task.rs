//! Per-file rename tasks.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One file affected by a rename transaction.
///
/// The path pair is fixed at resolution time; the outcome fields are filled
/// in as the transaction executes. Tasks move through the engine by value:
/// the forward pass consumes each pending task and produces its completed or
/// failed form, so no shared mutable state crosses the progress-callback
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRenameTask {
    /// Vault-relative path the file currently lives at.
    pub from_path: PathBuf,
    /// Vault-relative path the file is renamed to.
    pub to_path: PathBuf,
    /// Whether the rename has been applied.
    pub succeeded: bool,
    /// Failure message, set when the individual rename failed.
    pub error_message: Option<String>,
}

impl FileRenameTask {
    /// Create a pending task for a path pair.
    pub fn new(from_path: impl Into<PathBuf>, to_path: impl Into<PathBuf>) -> Self {
        Self {
            from_path: from_path.into(),
            to_path: to_path.into(),
            succeeded: false,
            error_message: None,
        }
    }

    /// Consume the task into its applied form.
    pub fn completed(self) -> Self {
        Self {
            succeeded: true,
            error_message: None,
            ..self
        }
    }

    /// Consume the task into its failed form.
    pub fn failed(self, message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            error_message: Some(message.into()),
            ..self
        }
    }
}
