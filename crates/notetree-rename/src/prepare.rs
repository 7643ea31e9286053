//! Destination directory preparation.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use notetree_core::{FileRenameTask, RenameError};

use crate::vault::Vault;

/// Create every missing parent directory of the tasks' target paths.
///
/// Creations are issued concurrently and jointly awaited. The returned list
/// holds only directories this call actually created — the sole rollback
/// liability; directories that already existed are never touched later.
/// Individual creation failures are logged and left for the corresponding
/// rename to surface as a per-file error. Fails only when the cancellation
/// token is already signaled on entry.
pub async fn prepare_directories(
    vault: Arc<dyn Vault>,
    tasks: &[FileRenameTask],
    cancel: &CancellationToken,
) -> Result<Vec<PathBuf>, RenameError> {
    if cancel.is_cancelled() {
        return Err(RenameError::Cancelled {
            reverted: 0,
            compensation_errors: Vec::new(),
        });
    }

    let missing: BTreeSet<PathBuf> = tasks
        .iter()
        .filter_map(|task| task.to_path.parent())
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .filter(|parent| !vault.exists(parent))
        .collect();

    let handles: Vec<_> = missing
        .into_iter()
        .map(|dir| {
            let vault = Arc::clone(&vault);
            tokio::task::spawn_blocking(move || {
                let result = vault.create_directory(&dir);
                (dir, result)
            })
        })
        .collect();

    let mut created = Vec::new();
    for joined in join_all(handles).await {
        match joined {
            Ok((dir, Ok(()))) => created.push(dir),
            Ok((dir, Err(e))) => {
                warn!(dir = %dir.display(), error = %e, "directory creation failed");
            }
            Err(e) => warn!(error = %e, "directory creation task panicked"),
        }
    }

    Ok(created)
}
