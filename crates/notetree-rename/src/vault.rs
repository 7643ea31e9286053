//! Vault storage abstraction.

use std::fs;
use std::path::{Path, PathBuf};

use notetree_core::VaultError;

/// Storage capabilities the engine consumes.
///
/// Paths are vault-relative; implementations decide where the vault actually
/// lives. The engine never reads or writes file contents — it only moves
/// entries around and manages directories.
pub trait Vault: Send + Sync {
    /// Whether an entry exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Every file in the vault, in unspecified order.
    fn list_all_files(&self) -> Vec<PathBuf>;

    /// Rename a file or directory. Fails if the target is already occupied.
    fn rename_entry(&self, from: &Path, to: &Path) -> Result<(), VaultError>;

    /// Create a directory, including any missing ancestors.
    fn create_directory(&self, path: &Path) -> Result<(), VaultError>;

    /// Remove a directory only if it has no entries.
    fn delete_directory_if_empty(&self, path: &Path) -> Result<(), VaultError>;
}

/// [`Vault`] backed by a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct OsVault {
    root: PathBuf,
}

impl OsVault {
    /// Create a vault rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The vault's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    fn collect_files(dir: &Path, root: &Path, out: &mut Vec<PathBuf>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                Self::collect_files(&path, root, out);
            } else if let Ok(relative) = path.strip_prefix(root) {
                out.push(relative.to_path_buf());
            }
        }
    }
}

impl Vault for OsVault {
    fn exists(&self, path: &Path) -> bool {
        self.absolute(path).exists()
    }

    fn list_all_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        Self::collect_files(&self.root, &self.root, &mut files);
        files
    }

    fn rename_entry(&self, from: &Path, to: &Path) -> Result<(), VaultError> {
        let from_abs = self.absolute(from);
        let to_abs = self.absolute(to);
        if !from_abs.exists() {
            return Err(VaultError::NotFound {
                path: from.to_path_buf(),
            });
        }
        if to_abs.exists() && to_abs != from_abs {
            return Err(VaultError::AlreadyExists {
                path: to.to_path_buf(),
            });
        }
        fs::rename(&from_abs, &to_abs).map_err(|e| VaultError::io(from, e))
    }

    fn create_directory(&self, path: &Path) -> Result<(), VaultError> {
        fs::create_dir_all(self.absolute(path)).map_err(|e| VaultError::io(path, e))
    }

    fn delete_directory_if_empty(&self, path: &Path) -> Result<(), VaultError> {
        let abs = self.absolute(path);
        let mut entries = fs::read_dir(&abs).map_err(|e| VaultError::io(path, e))?;
        if entries.next().is_some() {
            return Err(VaultError::NotEmpty {
                path: path.to_path_buf(),
            });
        }
        fs::remove_dir(&abs).map_err(|e| VaultError::io(path, e))
    }
}
