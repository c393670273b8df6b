//! Configuration for validation and retargeting.

use serde::{Deserialize, Serialize};

/// Default tolerance on `| |q| - 1 |` for rotations and twists.
pub const DEFAULT_ROTATION_TOLERANCE: f32 = 1e-4;

/// Settings for the validation pass run on loaded data.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub rotation_tolerance: f32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            rotation_tolerance: DEFAULT_ROTATION_TOLERANCE,
        }
    }
}

/// Settings for a retargeting call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetargetConfig {
    /// Use the mapping with source and target roles swapped.
    pub invert_map: bool,
    /// Twists further than this from unit length reject the mapping.
    pub rotation_tolerance: f32,
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            invert_map: false,
            rotation_tolerance: DEFAULT_ROTATION_TOLERANCE,
        }
    }
}

impl RetargetConfig {
    pub fn inverted(mut self) -> Self {
        self.invert_map = true;
        self
    }
}
