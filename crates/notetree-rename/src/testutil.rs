//! In-memory vault and helpers shared by the unit tests.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use notetree_core::VaultError;
use tokio_util::sync::CancellationToken;

use crate::vault::Vault;

/// Vault held entirely in memory, with per-path failure injection.
#[derive(Debug, Default)]
pub struct MemVault {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    files: BTreeSet<PathBuf>,
    dirs: BTreeSet<PathBuf>,
    fail_renames: BTreeSet<PathBuf>,
    fail_dir_creates: BTreeSet<PathBuf>,
    rename_log: Vec<(PathBuf, PathBuf)>,
}

impl MemVault {
    pub fn with_files<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let vault = Self::default();
        {
            let mut state = vault.state.lock().unwrap();
            for path in paths {
                state.files.insert(path.into());
            }
        }
        vault
    }

    pub fn add_dir(&self, path: impl Into<PathBuf>) {
        self.state.lock().unwrap().dirs.insert(path.into());
    }

    /// Make every rename whose source is `path` fail.
    pub fn fail_rename_of(&self, path: impl Into<PathBuf>) {
        self.state.lock().unwrap().fail_renames.insert(path.into());
    }

    /// Make creation of the given directory fail.
    pub fn fail_creation_of(&self, path: impl Into<PathBuf>) {
        self.state
            .lock()
            .unwrap()
            .fail_dir_creates
            .insert(path.into());
    }

    pub fn files(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().files.iter().cloned().collect()
    }

    pub fn dirs(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().dirs.iter().cloned().collect()
    }

    /// Successful renames, oldest first.
    pub fn rename_log(&self) -> Vec<(PathBuf, PathBuf)> {
        self.state.lock().unwrap().rename_log.clone()
    }

    pub fn has_file(&self, path: impl AsRef<Path>) -> bool {
        self.state.lock().unwrap().files.contains(path.as_ref())
    }
}

impl Vault for MemVault {
    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.files.contains(path)
            || state.dirs.contains(path)
            || state.files.iter().any(|f| f.starts_with(path) && f != path)
    }

    fn list_all_files(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().files.iter().cloned().collect()
    }

    fn rename_entry(&self, from: &Path, to: &Path) -> Result<(), VaultError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_renames.contains(from) {
            return Err(VaultError::io(from, std::io::Error::other("injected failure")));
        }
        if !state.files.contains(from) {
            return Err(VaultError::NotFound {
                path: from.to_path_buf(),
            });
        }
        if state.files.contains(to) {
            return Err(VaultError::AlreadyExists {
                path: to.to_path_buf(),
            });
        }
        state.files.remove(from);
        state.files.insert(to.to_path_buf());
        state.rename_log.push((from.to_path_buf(), to.to_path_buf()));
        Ok(())
    }

    fn create_directory(&self, path: &Path) -> Result<(), VaultError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_dir_creates.contains(path) {
            return Err(VaultError::io(path, std::io::Error::other("injected failure")));
        }
        state.dirs.insert(path.to_path_buf());
        Ok(())
    }

    fn delete_directory_if_empty(&self, path: &Path) -> Result<(), VaultError> {
        let mut state = self.state.lock().unwrap();
        let occupied = state.files.iter().any(|f| f.starts_with(path) && f != path)
            || state.dirs.iter().any(|d| d.starts_with(path) && d != path);
        if occupied {
            return Err(VaultError::NotEmpty {
                path: path.to_path_buf(),
            });
        }
        if !state.dirs.remove(path) {
            return Err(VaultError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }
}

/// Delegating vault that cancels a token after N successful renames,
/// simulating a user pressing cancel mid-transaction.
pub struct CancelAfterVault {
    inner: MemVault,
    token: CancellationToken,
    after: usize,
    seen: AtomicUsize,
}

impl CancelAfterVault {
    pub fn new(inner: MemVault, token: CancellationToken, after: usize) -> Self {
        Self {
            inner,
            token,
            after,
            seen: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &MemVault {
        &self.inner
    }
}

/// Delegating vault whose first rename announces itself on `ready`, then
/// blocks until the test sends on `release`. If the release never arrives the
/// rename fails instead of hanging the suite.
pub struct GatedVault {
    inner: MemVault,
    ready: tokio::sync::mpsc::UnboundedSender<()>,
    release: Mutex<std::sync::mpsc::Receiver<()>>,
    armed: AtomicBool,
}

impl GatedVault {
    pub fn new(
        inner: MemVault,
        ready: tokio::sync::mpsc::UnboundedSender<()>,
        release: std::sync::mpsc::Receiver<()>,
    ) -> Self {
        Self {
            inner,
            ready,
            release: Mutex::new(release),
            armed: AtomicBool::new(false),
        }
    }
}

impl Vault for GatedVault {
    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn list_all_files(&self) -> Vec<PathBuf> {
        self.inner.list_all_files()
    }

    fn rename_entry(&self, from: &Path, to: &Path) -> Result<(), VaultError> {
        if !self.armed.swap(true, Ordering::SeqCst) {
            let _ = self.ready.send(());
            let released = self
                .release
                .lock()
                .unwrap()
                .recv_timeout(Duration::from_secs(5));
            if released.is_err() {
                return Err(VaultError::io(
                    from,
                    std::io::Error::other("release signal never arrived"),
                ));
            }
        }
        self.inner.rename_entry(from, to)
    }

    fn create_directory(&self, path: &Path) -> Result<(), VaultError> {
        self.inner.create_directory(path)
    }

    fn delete_directory_if_empty(&self, path: &Path) -> Result<(), VaultError> {
        self.inner.delete_directory_if_empty(path)
    }
}

impl Vault for CancelAfterVault {
    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn list_all_files(&self) -> Vec<PathBuf> {
        self.inner.list_all_files()
    }

    fn rename_entry(&self, from: &Path, to: &Path) -> Result<(), VaultError> {
        let result = self.inner.rename_entry(from, to);
        if result.is_ok() && self.seen.fetch_add(1, Ordering::SeqCst) + 1 == self.after {
            self.token.cancel();
        }
        result
    }

    fn create_directory(&self, path: &Path) -> Result<(), VaultError> {
        self.inner.create_directory(path)
    }

    fn delete_directory_if_empty(&self, path: &Path) -> Result<(), VaultError> {
        self.inner.delete_directory_if_empty(path)
    }
}
