//! Engine configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for the rename engine.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct RenameConfig {
    /// Maximum number of completed transactions kept for undo.
    #[builder(default = "10")]
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Buffer size of the progress channels handed to the engine.
    #[builder(default = "100")]
    #[serde(default = "default_channel_size")]
    pub progress_channel_size: usize,
}

fn default_history_capacity() -> usize {
    10
}

fn default_channel_size() -> usize {
    100
}

impl RenameConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.history_capacity == Some(0) {
            return Err("History capacity must be at least 1".to_string());
        }
        if self.progress_channel_size == Some(0) {
            return Err("Progress channel size must be at least 1".to_string());
        }
        Ok(())
    }
}

impl RenameConfig {
    /// Create a new config builder.
    pub fn builder() -> RenameConfigBuilder {
        RenameConfigBuilder::default()
    }
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            progress_channel_size: default_channel_size(),
        }
    }
}
