//! Engine facade consumed by the host's tree panel.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use notetree_core::{
    FileRenameTask, Phase, RenameConfig, RenameError, RenameIssue, RenameRequest,
    TransactionProgress,
};

use crate::history::UndoHistory;
use crate::rollback::revert;
use crate::transaction;
use crate::vault::Vault;

/// Outcome of undoing the most recent transaction.
#[derive(Debug, Clone)]
pub struct UndoOutcome {
    /// Original path of the primary entry; the host refocuses the tree here.
    pub restored_path: PathBuf,
    /// Reversal failures, surfaced as data for display.
    pub compensation_errors: Vec<RenameIssue>,
}

/// The hierarchical rename engine.
///
/// One instance per open vault. Transactions run one at a time on the host's
/// UI-bound runtime; the engine installs a fresh cancellation token per
/// transaction so the UI's cancel button reaches exactly the rename it was
/// shown for, and keeps a bounded history of completed transactions for undo.
pub struct RenameEngine {
    vault: Arc<dyn Vault>,
    config: RenameConfig,
    history: Mutex<UndoHistory>,
    current: Mutex<Option<CancellationToken>>,
}

impl RenameEngine {
    /// Create an engine over a vault.
    pub fn new(vault: Arc<dyn Vault>, config: RenameConfig) -> Self {
        let history = UndoHistory::new(config.history_capacity);
        Self {
            vault,
            config,
            history: Mutex::new(history),
            current: Mutex::new(None),
        }
    }

    /// Create a progress channel sized per the engine configuration.
    pub fn progress_channel(
        &self,
    ) -> (
        mpsc::Sender<TransactionProgress>,
        mpsc::Receiver<TransactionProgress>,
    ) {
        mpsc::channel(self.config.progress_channel_size)
    }

    /// Execute a rename transaction and record it for undo.
    ///
    /// Cancellation rolls the transaction back and fails the call; every
    /// other problem is reported per task in the returned list, so callers
    /// inspect `succeeded` to judge the overall outcome.
    pub async fn perform_rename(
        &self,
        request: RenameRequest,
        progress_tx: &mpsc::Sender<TransactionProgress>,
    ) -> Result<Vec<FileRenameTask>, RenameError> {
        // Fresh token per transaction; a stale cancel signal must never leak
        // into the next rename.
        let token = CancellationToken::new();
        *self.current.lock().await = Some(token.clone());

        let result =
            transaction::execute(Arc::clone(&self.vault), &request, progress_tx, &token).await;

        *self.current.lock().await = None;

        if let Ok(tasks) = &result {
            self.history.lock().await.record(tasks.clone(), request);
        }
        result
    }

    /// Signal cancellation of the in-flight transaction, if any.
    pub async fn cancel_current_rename(&self) {
        if let Some(token) = self.current.lock().await.as_ref() {
            debug!("cancellation requested");
            token.cancel();
        }
    }

    /// Undo the most recently completed transaction.
    ///
    /// Returns `None` when the history is empty, in which case the host shows
    /// its "nothing to undo" notice. The popped transaction is never
    /// re-pushed, even when some reversals fail — the failures travel in the
    /// outcome instead. Unlike cancellation rollback, undo removes no
    /// directories: occupancy cannot be assumed transaction-scoped after the
    /// fact.
    pub async fn undo_last_rename(
        &self,
        progress_tx: &mpsc::Sender<TransactionProgress>,
    ) -> Option<UndoOutcome> {
        let transaction = self.history.lock().await.pop()?;

        let compensation_errors = revert(
            Arc::clone(&self.vault),
            &transaction.tasks,
            &[],
            Phase::Forward,
            progress_tx,
        )
        .await;

        let restored_path = transaction
            .tasks
            .first()
            .map(|t| t.from_path.clone())
            .unwrap_or_else(|| transaction.request.original_path.clone());

        Some(UndoOutcome {
            restored_path,
            compensation_errors,
        })
    }

    /// Number of transactions available for undo.
    pub async fn history_len(&self) -> usize {
        self.history.lock().await.len()
    }

    /// Whether an undo is currently possible.
    pub async fn can_undo(&self) -> bool {
        !self.history.lock().await.is_empty()
    }

    /// Description of the transaction the next undo would revert.
    pub async fn peek_undo_description(&self) -> Option<String> {
        self.history.lock().await.peek().map(|t| t.description())
    }
}
