//! Compensation for applied renames.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use notetree_core::{FileRenameTask, Phase, RenameIssue, TransactionProgress, VaultError};

use crate::vault::Vault;

/// Revert the succeeded tasks of a transaction, most recently applied first,
/// then remove any transaction-created directory that is now empty.
///
/// Never fails: every reversal problem is collected into the returned list so
/// the caller can decide how loudly to report it. Directory removal failures
/// and skips are only logged — a created-but-now-occupied directory is left
/// standing on purpose, since something may have been written into it since.
///
/// Cancellation rollback passes [`Phase::Rollback`]; undo re-executes forward
/// and passes [`Phase::Forward`]. Keeping the phase a parameter keeps the two
/// reversal paths as two call sites of one function rather than a flag-driven
/// branch.
pub async fn revert(
    vault: Arc<dyn Vault>,
    tasks: &[FileRenameTask],
    created_dirs: &[PathBuf],
    phase: Phase,
    progress_tx: &mpsc::Sender<TransactionProgress>,
) -> Vec<RenameIssue> {
    let applied: Vec<&FileRenameTask> = tasks.iter().filter(|t| t.succeeded).collect();

    let mut progress = TransactionProgress::new(applied.len(), phase);
    progress.message = Some("restoring original paths".to_string());
    let _ = progress_tx.send(progress.clone()).await;
    progress.message = None;

    for (index, task) in applied.iter().enumerate().rev() {
        let vault = Arc::clone(&vault);
        let from = task.to_path.clone();
        let to = task.from_path.clone();
        let joined = tokio::task::spawn_blocking(move || vault.rename_entry(&from, &to)).await;

        match joined {
            Ok(Ok(())) => progress.record_success(index, &task.from_path),
            Ok(Err(e)) => {
                warn!(path = %task.to_path.display(), error = %e, "reversal failed");
                progress.record_failure(index, &task.to_path, e.to_string());
            }
            Err(e) => {
                warn!(path = %task.to_path.display(), error = %e, "reversal task panicked");
                progress.record_failure(index, &task.to_path, format!("Task failed: {e}"));
            }
        }
        let _ = progress_tx.send(progress.clone()).await;
    }

    // Deepest directories first, so a parent emptied by its child's removal
    // is still considered in this same pass. One pass only; anything left
    // non-empty stays.
    let mut dirs: Vec<PathBuf> = created_dirs.to_vec();
    dirs.sort_by_key(|dir| std::cmp::Reverse(dir.components().count()));

    for dir in dirs {
        let vault = Arc::clone(&vault);
        let target = dir.clone();
        let joined =
            tokio::task::spawn_blocking(move || vault.delete_directory_if_empty(&target)).await;

        match joined {
            Ok(Ok(())) => debug!(dir = %dir.display(), "removed transaction-created directory"),
            Ok(Err(VaultError::NotEmpty { .. })) => {
                debug!(dir = %dir.display(), "leaving non-empty directory in place");
            }
            Ok(Err(e)) => warn!(dir = %dir.display(), error = %e, "directory removal failed"),
            Err(e) => warn!(dir = %dir.display(), error = %e, "directory removal task panicked"),
        }
    }

    progress.errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MemVault;

    fn applied(from: &str, to: &str) -> FileRenameTask {
        FileRenameTask::new(from, to).completed()
    }

    #[tokio::test]
    async fn test_reverts_in_reverse_order_skipping_failed_tasks() {
        let vault = Arc::new(MemVault::with_files(["x.md", "y.md"]));
        let tasks = vec![
            applied("a.md", "x.md"),
            FileRenameTask::new("b.md", "broken.md").failed("denied"),
            applied("c.md", "y.md"),
        ];

        let (tx, mut rx) = mpsc::channel(16);
        let issues = revert(
            Arc::clone(&vault) as Arc<dyn Vault>,
            &tasks,
            &[],
            Phase::Rollback,
            &tx,
        )
        .await;
        drop(tx);

        assert!(issues.is_empty());
        let expected: Vec<(PathBuf, PathBuf)> = vec![
            ("y.md".into(), "c.md".into()),
            ("x.md".into(), "a.md".into()),
        ];
        assert_eq!(vault.rename_log(), expected);
        assert!(vault.has_file("a.md"));
        assert!(vault.has_file("c.md"));

        let mut phases = Vec::new();
        while let Some(progress) = rx.recv().await {
            phases.push(progress.phase);
            assert_eq!(progress.total, 2);
        }
        assert!(phases.iter().all(|p| *p == Phase::Rollback));
    }

    #[tokio::test]
    async fn test_reversal_failures_are_collected_not_raised() {
        let vault = Arc::new(MemVault::with_files(["x.md", "y.md"]));
        vault.fail_rename_of("x.md");
        let tasks = vec![applied("a.md", "x.md"), applied("c.md", "y.md")];

        let (tx, _rx) = mpsc::channel(16);
        let issues = revert(
            Arc::clone(&vault) as Arc<dyn Vault>,
            &tasks,
            &[],
            Phase::Rollback,
            &tx,
        )
        .await;

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, PathBuf::from("x.md"));
        // The other reversal still went through.
        assert!(vault.has_file("c.md"));
    }

    #[tokio::test]
    async fn test_removes_only_empty_created_directories_deepest_first() {
        let vault = Arc::new(MemVault::with_files(["occupied/note.md"]));
        vault.add_dir("occupied");
        vault.add_dir("empty");
        vault.add_dir("empty/deep");

        let created = vec![
            PathBuf::from("empty"),
            PathBuf::from("occupied"),
            PathBuf::from("empty/deep"),
        ];
        let (tx, _rx) = mpsc::channel(16);
        let issues = revert(
            Arc::clone(&vault) as Arc<dyn Vault>,
            &[],
            &created,
            Phase::Rollback,
            &tx,
        )
        .await;

        assert!(issues.is_empty());
        assert_eq!(vault.dirs(), vec![PathBuf::from("occupied")]);
    }

    #[tokio::test]
    async fn test_undo_reports_forward_phase() {
        let vault = Arc::new(MemVault::with_files(["x.md"]));
        let tasks = vec![applied("a.md", "x.md")];

        let (tx, mut rx) = mpsc::channel(16);
        let issues = revert(
            Arc::clone(&vault) as Arc<dyn Vault>,
            &tasks,
            &[],
            Phase::Forward,
            &tx,
        )
        .await;
        drop(tx);

        assert!(issues.is_empty());
        while let Some(progress) = rx.recv().await {
            assert_eq!(progress.phase, Phase::Forward);
        }
    }
}
