//! Checkpoint history configuration.

use serde::{Deserialize, Serialize};

/// Smallest accepted retention limit.
pub const MIN_CHECKPOINTS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Take a checkpoint before every edit, load or unload.
    pub auto_add: bool,
    /// Oldest checkpoints are evicted beyond this count.
    pub max_checkpoints: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            auto_add: true,
            max_checkpoints: 20,
        }
    }
}
