//! The rename transaction state machine.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use notetree_core::{FileRenameTask, Phase, RenameError, RenameRequest, TransactionProgress};

use crate::prepare::prepare_directories;
use crate::resolver::resolve_tasks;
use crate::rollback::revert;
use crate::vault::Vault;

/// Execute one rename transaction.
///
/// Walks `Idle → Preparing → Renaming → {Completed | Cancelled}`. Individual
/// rename failures are isolated: they are recorded on the task and the batch
/// continues, so a batch containing failures still completes. Cancellation is
/// cooperative — the token is polled before preparation, after preparation,
/// and before each rename; an in-flight rename is always allowed to finish.
/// An observed cancellation triggers synchronous compensation over whatever
/// has been applied so far, after which the call fails with
/// [`RenameError::Cancelled`].
pub async fn execute(
    vault: Arc<dyn Vault>,
    request: &RenameRequest,
    progress_tx: &mpsc::Sender<TransactionProgress>,
    cancel: &CancellationToken,
) -> Result<Vec<FileRenameTask>, RenameError> {
    let tasks = resolve_tasks(vault.as_ref(), request);

    let mut progress = TransactionProgress::new(tasks.len(), Phase::Forward);
    progress.message = Some("preparing directories".to_string());
    let _ = progress_tx.send(progress.clone()).await;
    progress.message = None;

    // Checkpoint: before preparation.
    if cancel.is_cancelled() {
        return cancelled(Arc::clone(&vault), &tasks, &[], progress_tx).await;
    }

    let created_dirs = match prepare_directories(Arc::clone(&vault), &tasks, cancel).await {
        Ok(dirs) => dirs,
        Err(_) => return cancelled(Arc::clone(&vault), &tasks, &[], progress_tx).await,
    };

    // Checkpoint: after preparation. Directories may have been created by
    // now, so they join the rollback liability.
    if cancel.is_cancelled() {
        return cancelled(Arc::clone(&vault), &tasks, &created_dirs, progress_tx).await;
    }

    let mut done: Vec<FileRenameTask> = Vec::with_capacity(tasks.len());
    for (index, task) in tasks.into_iter().enumerate() {
        // Checkpoint: before each rename.
        if cancel.is_cancelled() {
            return cancelled(Arc::clone(&vault), &done, &created_dirs, progress_tx).await;
        }

        // Renames go through the blocking pool so the runtime stays
        // responsive while the filesystem works.
        let joined = {
            let vault = Arc::clone(&vault);
            let from = task.from_path.clone();
            let to = task.to_path.clone();
            tokio::task::spawn_blocking(move || vault.rename_entry(&from, &to)).await
        };

        let task = match joined {
            Ok(Ok(())) => {
                progress.record_success(index, &task.from_path);
                task.completed()
            }
            Ok(Err(e)) => {
                warn!(path = %task.from_path.display(), error = %e, "rename failed");
                progress.record_failure(index, &task.from_path, e.to_string());
                task.failed(e.to_string())
            }
            Err(e) => {
                warn!(path = %task.from_path.display(), error = %e, "rename task panicked");
                let message = format!("Task failed: {e}");
                progress.record_failure(index, &task.from_path, message.clone());
                task.failed(message)
            }
        };
        done.push(task);
        let _ = progress_tx.send(progress.clone()).await;
    }

    debug!(
        total = done.len(),
        successful = progress.successful,
        failed = progress.failed,
        "rename transaction completed"
    );
    Ok(done)
}

/// Compensate and fail the transaction.
async fn cancelled(
    vault: Arc<dyn Vault>,
    tasks: &[FileRenameTask],
    created_dirs: &[PathBuf],
    progress_tx: &mpsc::Sender<TransactionProgress>,
) -> Result<Vec<FileRenameTask>, RenameError> {
    let reverted = tasks.iter().filter(|t| t.succeeded).count();
    let compensation_errors = revert(vault, tasks, created_dirs, Phase::Rollback, progress_tx).await;
    Err(RenameError::Cancelled {
        reverted,
        compensation_errors,
    })
}
