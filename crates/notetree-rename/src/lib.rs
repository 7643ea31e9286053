//! Hierarchical rename transaction engine for notetree.
//!
//! Notes carry dot-delimited ("Dendron-style") names whose segments encode a
//! logical parent/child hierarchy independent of folder structure. Renaming a
//! note may therefore touch the note alone or the note plus every descendant
//! sharing its dotted prefix. This crate resolves the affected file set,
//! prepares missing destination directories, executes the renames with
//! per-file failure isolation and cooperative cancellation, rolls back on
//! cancellation, and keeps a bounded history so a completed rename can be
//! undone afterwards. Progress streams to the host UI via channels.

mod engine;
mod history;
mod prepare;
mod resolver;
mod rollback;
mod transaction;
mod vault;

#[cfg(test)]
pub(crate) mod testutil;

pub use engine::{RenameEngine, UndoOutcome};
pub use history::{RenameTransaction, UndoHistory};
pub use prepare::prepare_directories;
pub use resolver::resolve_tasks;
pub use rollback::revert;
pub use transaction::execute;
pub use vault::{OsVault, Vault};
