//! Bounded undo history for completed rename transactions.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use notetree_core::{FileRenameTask, RenameRequest};

/// A completed transaction as remembered for undo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameTransaction {
    /// The tasks as they ended up: succeeded tasks carry the applied rename,
    /// failed tasks carry their error and are never reverted.
    pub tasks: Vec<FileRenameTask>,
    /// The request that produced them.
    pub request: RenameRequest,
}

impl RenameTransaction {
    /// Human-readable description, for the host's undo menu entry.
    pub fn description(&self) -> String {
        format!(
            "Rename '{}' to '{}' ({} file(s))",
            self.request.original_path.display(),
            self.request.new_path.display(),
            self.tasks.iter().filter(|t| t.succeeded).count(),
        )
    }
}

/// Undo stack with bounded depth and oldest-first eviction.
///
/// Lives only for the process lifetime; nothing is persisted. Entries are
/// pushed after a transaction completes with at least one success and popped
/// when undone, whether or not the undo itself fully succeeds.
#[derive(Debug)]
pub struct UndoHistory {
    entries: VecDeque<RenameTransaction>,
    capacity: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(10)
    }
}

impl UndoHistory {
    /// Create a history bounded at `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a completed transaction.
    ///
    /// Transactions with no successful task are skipped; undo would have
    /// nothing to revert.
    pub fn record(&mut self, tasks: Vec<FileRenameTask>, request: RenameRequest) {
        if !tasks.iter().any(|t| t.succeeded) {
            return;
        }
        if self.entries.len() >= self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                debug!(transaction = %evicted.description(), "undo history full, evicting oldest");
            }
        }
        self.entries.push_back(RenameTransaction { tasks, request });
    }

    /// Remove and return the most recent transaction.
    pub fn pop(&mut self) -> Option<RenameTransaction> {
        self.entries.pop_back()
    }

    /// Peek at the most recent transaction without removing it.
    pub fn peek(&self) -> Option<&RenameTransaction> {
        self.entries.back()
    }

    /// Number of recorded transactions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the history is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all recorded transactions.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
