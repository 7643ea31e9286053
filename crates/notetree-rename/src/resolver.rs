//! Child-set resolution for hierarchical renames.

use std::path::{Path, PathBuf};

use notetree_core::{EntryKind, FileRenameTask, RenameMode, RenameRequest};

use crate::vault::Vault;

/// Expand a rename request into the ordered list of file rename tasks.
///
/// The primary entry comes first, followed by its dot-delimited descendants
/// in lexicographic order. Folder renames and `FileOnly` requests always
/// resolve to a single task. Never fails: a request with no matching files
/// still yields the primary path pair as a single task.
pub fn resolve_tasks(vault: &dyn Vault, request: &RenameRequest) -> Vec<FileRenameTask> {
    if request.mode == RenameMode::FileOnly || request.entry_kind == EntryKind::Folder {
        return vec![FileRenameTask::new(&request.original_path, &request.new_path)];
    }

    let original_stem = stem_of(&request.original_path);
    let descendant_prefix = format!("{original_stem}.");

    let mut descendants: Vec<PathBuf> = vault
        .list_all_files()
        .into_iter()
        .filter(|path| {
            *path != request.original_path && stem_of(path).starts_with(&descendant_prefix)
        })
        .collect();
    descendants.sort();

    let mut tasks = Vec::with_capacity(descendants.len() + 1);
    if vault.exists(&request.original_path) {
        tasks.push(FileRenameTask::new(&request.original_path, &request.new_path));
    }
    for path in descendants {
        let target = derive_target(&path, &original_stem, &request.new_path);
        tasks.push(FileRenameTask::new(path, target));
    }

    if tasks.is_empty() {
        // Nothing on disk matched; hand back the primary pair anyway so the
        // caller still gets a deterministic single-task transaction.
        tasks.push(FileRenameTask::new(&request.original_path, &request.new_path));
    }

    tasks
}

/// Path rendered without its final extension, used for dotted-prefix matching.
///
/// Both lengths come from the same lossy rendering: an extension is always
/// preceded by an ASCII dot, so the cut lands on a char boundary even when
/// the name holds non-UTF-8 bytes.
fn stem_of(path: &Path) -> String {
    let rendered = path.to_string_lossy();
    match path.extension() {
        Some(ext) => {
            let ext_rendered = ext.to_string_lossy();
            rendered[..rendered.len() - ext_rendered.len() - 1].to_string()
        }
        None => rendered.into_owned(),
    }
}

/// Derive a descendant's target path by swapping the shared dotted prefix.
///
/// Everything after the prefix — each remaining segment and the extension —
/// is carried over verbatim from `from`, so every descendant keeps its own
/// extension regardless of the primary file's. Only called on paths whose
/// stem extends `original_stem` by a dot, so the offset sits on that dot.
fn derive_target(from: &Path, original_stem: &str, new_path: &Path) -> PathBuf {
    let from_rendered = from.to_string_lossy();
    let suffix = &from_rendered[original_stem.len()..];
    let new_stem = stem_of(new_path);
    PathBuf::from(format!("{new_stem}{suffix}"))
}
