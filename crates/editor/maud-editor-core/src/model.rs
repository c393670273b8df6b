//! Editable model state captured by checkpoints.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use maud_animation_core::{
    validate_animation, validate_skeleton, Animation, AnimationError, Skeleton, SkeletonMapping,
    ValidationConfig,
};
use maud_history_core::{Snapshot, Snapshotting};

/// A loaded model: its skeleton and the animations authored for it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelAsset {
    pub name: String,
    pub skeleton: Skeleton,
    #[serde(default)]
    pub animations: Vec<Animation>,
}

impl ModelAsset {
    pub fn new(name: impl Into<String>, skeleton: Skeleton) -> Self {
        Self {
            name: name.into(),
            skeleton,
            animations: Vec::new(),
        }
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animations.push(animation);
        self
    }

    pub fn animation(&self, name: &str) -> Option<&Animation> {
        self.animations.iter().find(|a| a.name == name)
    }

    pub fn animation_names(&self) -> Vec<&str> {
        self.animations.iter().map(|a| a.name.as_str()).collect()
    }

    /// Run the validation pass over the skeleton and every animation.
    pub fn validate(&self, cfg: &ValidationConfig) -> Result<(), AnimationError> {
        validate_skeleton(&self.skeleton)?;
        if let Some(dup) = duplicate_name(self.animations.iter().map(|a| a.name.as_str())) {
            return Err(AnimationError::InvalidAnimation {
                animation: dup.to_string(),
                reason: format!("more than one animation in '{}' has this name", self.name),
            });
        }
        for animation in &self.animations {
            validate_animation(animation, &self.skeleton, cfg)?;
        }
        Ok(())
    }
}

/// First name that appears twice, if any.
fn duplicate_name<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    names.into_iter().find(|name| !seen.insert(*name))
}

/// Everything undo/redo restores.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorModel {
    pub source: Option<ModelAsset>,
    pub target: Option<ModelAsset>,
    #[serde(default)]
    pub mapping: SkeletonMapping,
    #[serde(default)]
    pub invert_mapping: bool,
}

impl Snapshotting for EditorModel {
    fn capture(&self) -> maud_history_core::Result<Snapshot> {
        Snapshot::of(self)
    }

    fn restore(&mut self, snapshot: &Snapshot) -> maud_history_core::Result<()> {
        *self = snapshot.restore_as()?;
        Ok(())
    }
}
