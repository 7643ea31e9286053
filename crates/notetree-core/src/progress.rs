//! Progress reporting types for rename transactions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Execution phase reported with each progress snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// First-pass renaming, or the forward re-execution performed by undo.
    Forward,
    /// Cancellation-triggered compensation. The UI uses this to show
    /// "restoring" rather than "renaming".
    Rollback,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forward => write!(f, "Renaming"),
            Self::Rollback => write!(f, "Restoring"),
        }
    }
}

/// A per-file problem carried as data, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameIssue {
    /// The path that caused the problem.
    pub path: PathBuf,
    /// A human-readable message.
    pub error: String,
}

impl RenameIssue {
    /// Create a new issue.
    pub fn new(path: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            error: error.into(),
        }
    }
}

impl std::fmt::Display for RenameIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

/// The most recently finished task within a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastOperation {
    /// Index of the task in resolution order.
    pub index: usize,
    /// Whether the task succeeded.
    pub success: bool,
    /// The task's source path.
    pub path: PathBuf,
}

/// Progress snapshot emitted during a rename transaction.
///
/// One logical value per emission; receivers get an owned clone and never
/// observe later mutations. `completed == successful + failed` holds at all
/// times once the forward pass starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionProgress {
    /// Total number of tasks in this pass.
    pub total: usize,
    /// Tasks attempted so far.
    pub completed: usize,
    /// Tasks that succeeded.
    pub successful: usize,
    /// Tasks that failed.
    pub failed: usize,
    /// Per-file problems, in the order they occurred.
    pub errors: Vec<RenameIssue>,
    /// The most recently finished task.
    pub last_operation: Option<LastOperation>,
    /// Which pass is running.
    pub phase: Phase,
    /// Optional human-readable override (e.g. "preparing directories").
    pub message: Option<String>,
}

impl TransactionProgress {
    /// Create a fresh progress tracker for a pass.
    pub fn new(total: usize, phase: Phase) -> Self {
        Self {
            total,
            completed: 0,
            successful: 0,
            failed: 0,
            errors: Vec::new(),
            last_operation: None,
            phase,
            message: None,
        }
    }

    /// Record a successful task.
    pub fn record_success(&mut self, index: usize, path: &Path) {
        self.completed += 1;
        self.successful += 1;
        self.last_operation = Some(LastOperation {
            index,
            success: true,
            path: path.to_path_buf(),
        });
    }

    /// Record a failed task.
    pub fn record_failure(&mut self, index: usize, path: &Path, error: impl Into<String>) {
        self.completed += 1;
        self.failed += 1;
        self.errors.push(RenameIssue::new(path, error));
        self.last_operation = Some(LastOperation {
            index,
            success: false,
            path: path.to_path_buf(),
        });
    }

    /// Get the progress as a percentage (0.0 to 100.0).
    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            (self.completed as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Check if the pass has any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
