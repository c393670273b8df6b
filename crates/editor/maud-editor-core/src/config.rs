use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use maud_animation_core::{RetargetConfig, ValidationConfig};
use maud_history_core::HistoryConfig;

/// Session settings; every field may be omitted from JSON.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub history: HistoryConfig,
    pub retarget: RetargetConfig,
    pub validation: ValidationConfig,
}

impl SessionConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("parse session config")
    }
}
