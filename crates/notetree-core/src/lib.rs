//! Core types for the notetree rename engine.
//!
//! This crate provides the data structures shared between the rename engine
//! and the tree panel that consumes it: rename requests, per-file tasks, the
//! progress protocol, configuration, and the error taxonomy.

mod config;
mod error;
mod progress;
mod request;
mod task;

pub use config::{RenameConfig, RenameConfigBuilder};
pub use error::{RenameError, VaultError};
pub use progress::{LastOperation, Phase, RenameIssue, TransactionProgress};
pub use request::{EntryKind, RenameMode, RenameRequest};
pub use task::FileRenameTask;
