//! Rename request types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which files one rename request applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenameMode {
    /// Rename only the requested note.
    FileOnly,
    /// Rename the note together with every dot-delimited descendant note.
    FileAndDescendants,
}

/// The kind of tree entry a rename was requested for.
///
/// Only `File` and `Folder` ever reach the engine; placeholder kinds are
/// resolved to concrete files by the tree panel before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Folder,
    /// Placeholder synthesized from a glob/regex pattern rule.
    VirtualPlaceholder,
    /// Placeholder synthesized by the schema suggestion engine.
    SuggestedPlaceholder,
}

/// A request to rename one note, immutable for the duration of a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRequest {
    /// Current vault-relative path of the primary entry.
    pub original_path: PathBuf,
    /// Target vault-relative path of the primary entry.
    pub new_path: PathBuf,
    /// Display name component of `new_path`, echoed back to the UI.
    pub new_title: String,
    /// Whether descendants are renamed along with the primary entry.
    pub mode: RenameMode,
    /// What kind of entry the request was made against.
    pub entry_kind: EntryKind,
}

impl RenameRequest {
    /// Create a new rename request.
    pub fn new(
        original_path: impl Into<PathBuf>,
        new_path: impl Into<PathBuf>,
        new_title: impl Into<String>,
        mode: RenameMode,
        entry_kind: EntryKind,
    ) -> Self {
        Self {
            original_path: original_path.into(),
            new_path: new_path.into(),
            new_title: new_title.into(),
            mode,
            entry_kind,
        }
    }
}
