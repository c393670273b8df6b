//! The editing session: one model, its checkpoint history and the status
//! line. Every edit takes an automatic checkpoint before it mutates the
//! model, so undo returns to the state the edit started from.

use anyhow::{anyhow, bail, Context, Result};
use log::{info, warn};

use maud_animation_core::interp::{is_unit_quat, quat_inverse};
use maud_animation_core::{
    parse_mapping_json, retarget_animation, validate_mapping, Animation, RetargetConfig,
};
use maud_history_core::{CheckpointHistory, HistoryStatus};

use crate::config::SessionConfig;
use crate::model::{EditorModel, ModelAsset};

#[derive(Debug)]
pub struct Session {
    model: EditorModel,
    history: CheckpointHistory,
    config: SessionConfig,
    status: Option<String>,
}

/// Which side of the mapping a model is loaded as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    Source,
    Target,
}

impl Role {
    fn label(self) -> &'static str {
        match self {
            Role::Source => "source",
            Role::Target => "target",
        }
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self> {
        let history = CheckpointHistory::new(config.history).context("create checkpoint history")?;
        Ok(Self {
            model: EditorModel::default(),
            history,
            config,
            status: None,
        })
    }

    pub fn model(&self) -> &EditorModel {
        &self.model
    }

    pub fn history(&self) -> &CheckpointHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut CheckpointHistory {
        &mut self.history
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Last status-bar message.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn load_source(&mut self, asset: ModelAsset) -> Result<()> {
        self.load(Role::Source, asset)
    }

    pub fn load_target(&mut self, asset: ModelAsset) -> Result<()> {
        self.load(Role::Target, asset)
    }

    /// Replace the bone mapping with one read from JSON. Returns the number
    /// of entries loaded.
    pub fn load_mapping_json(&mut self, json: &str) -> Result<usize> {
        let mapping = parse_mapping_json(json)
            .and_then(|m| {
                validate_mapping(&m, self.config.validation.rotation_tolerance)?;
                Ok(m)
            })
            .context("load skeleton map");
        let mapping = self.report(mapping)?;

        self.before_edit()?;
        let count = mapping.count_mappings();
        self.model.mapping = mapping;
        self.record(format!("load skeleton map ({count} entries)"));
        Ok(count)
    }

    /// Map `target_bone` of the target model to `source_bone` of the source
    /// model with an identity twist, replacing whatever drove `target_bone`.
    ///
    /// With the invert flag set the entry is stored reversed, so the stored
    /// table keeps its orientation. The stored table holds one entry per
    /// `source_bone` then, so a different target bone driven by `source_bone`
    /// loses its mapping; the event description names it.
    pub fn map_bones(&mut self, target_bone: &str, source_bone: &str) -> Result<()> {
        let checked = self
            .check_bone(Role::Target, target_bone)
            .and_then(|_| self.check_bone(Role::Source, source_bone));
        self.report(checked)?;

        self.before_edit()?;
        let displaced = if self.model.invert_mapping {
            self.model.mapping.unmap_source(target_bone);
            self.model.mapping.map_direct(source_bone, target_bone)
        } else {
            self.model.mapping.map_direct(target_bone, source_bone);
            None
        };
        let description = match displaced {
            Some(entry) => format!(
                "map {target_bone} <- {source_bone}, {} unmapped",
                entry.source()
            ),
            None => format!("map {target_bone} <- {source_bone}"),
        };
        self.record(description);
        Ok(())
    }

    /// Remove the mapping that drives `target_bone`. Returns false when the
    /// bone was not mapped.
    pub fn unmap_bone(&mut self, target_bone: &str) -> Result<bool> {
        let Some(key) = self.stored_key(target_bone) else {
            self.set_status(format!("{target_bone} is not mapped"));
            return Ok(false);
        };
        self.before_edit()?;
        if self.model.invert_mapping {
            self.model.mapping.unmap_source(target_bone);
        } else {
            self.model.mapping.unmap(&key);
        }
        self.record(format!("unmap {target_bone}"));
        Ok(true)
    }

    /// Set the twist applied when retargeting onto `target_bone`.
    pub fn set_twist(&mut self, target_bone: &str, twist: [f32; 4]) -> Result<()> {
        let tolerance = self.config.validation.rotation_tolerance;
        let key = if !is_unit_quat(twist, tolerance) {
            Err(anyhow!("twist {twist:?} for {target_bone} is not a unit quaternion"))
        } else {
            self.stored_key(target_bone)
                .ok_or_else(|| anyhow!("{target_bone} is not mapped"))
        };
        let key = self.report(key)?;

        let stored = if self.model.invert_mapping {
            quat_inverse(twist)
        } else {
            twist
        };
        self.before_edit()?;
        self.model.mapping.set_twist(&key, stored);
        self.record(format!("set twist of {target_bone}"));
        Ok(())
    }

    pub fn set_invert_mapping(&mut self, invert: bool) -> Result<()> {
        if self.model.invert_mapping == invert {
            return Ok(());
        }
        self.before_edit()?;
        self.model.invert_mapping = invert;
        let verb = if invert { "invert" } else { "un-invert" };
        self.record(format!("{verb} skeleton map"));
        Ok(())
    }

    /// Retarget `source_animation` of the source model onto the target model
    /// and add the result to the target's animations under `new_name`.
    /// Returns the number of tracks produced.
    pub fn retarget(&mut self, source_animation: &str, new_name: &str) -> Result<usize> {
        let result = self.compute_retarget(source_animation, new_name);
        let animation = self.report(result)?;

        self.before_edit()?;
        let track_count = animation.tracks.len();
        let target = self
            .model
            .target
            .as_mut()
            .ok_or_else(|| anyhow!("no target model loaded"))?;
        target.animations.push(animation);
        self.record(format!("retarget {source_animation} as {new_name} ({track_count} tracks)"));
        Ok(track_count)
    }

    /// Delete an animation from the target model.
    pub fn delete_target_animation(&mut self, name: &str) -> Result<()> {
        let position = self
            .model
            .target
            .as_ref()
            .ok_or_else(|| anyhow!("no target model loaded"))
            .and_then(|t| {
                t.animations
                    .iter()
                    .position(|a| a.name == name)
                    .ok_or_else(|| anyhow!("target has no animation named {name}"))
            });
        let position = self.report(position)?;

        self.before_edit()?;
        if let Some(target) = self.model.target.as_mut() {
            target.animations.remove(position);
        }
        self.record(format!("delete animation {name}"));
        Ok(())
    }

    /// Explicit checkpoint, independent of auto-add mode.
    pub fn add_checkpoint(&mut self) -> Result<usize> {
        let index = self.history.add_checkpoint(&self.model)?;
        self.set_status(format!("added checkpoint [{index}]"));
        Ok(index)
    }

    pub fn undo(&mut self) -> Result<HistoryStatus> {
        let status = self.history.undo(&mut self.model)?;
        self.set_status(status.message());
        Ok(status)
    }

    pub fn redo(&mut self) -> Result<HistoryStatus> {
        let status = self.history.redo(&mut self.model)?;
        self.set_status(status.message());
        Ok(status)
    }

    pub fn redo_all(&mut self) -> Result<HistoryStatus> {
        let status = self.history.redo_all(&mut self.model)?;
        self.set_status(status.message());
        Ok(status)
    }

    fn load(&mut self, role: Role, asset: ModelAsset) -> Result<()> {
        let checked = asset
            .validate(&self.config.validation)
            .with_context(|| format!("load {} model {}", role.label(), asset.name));
        self.report(checked)?;

        self.before_edit()?;
        let description = format!(
            "load {} model {} ({} bones, {} animations)",
            role.label(),
            asset.name,
            asset.skeleton.len(),
            asset.animations.len()
        );
        match role {
            Role::Source => self.model.source = Some(asset),
            Role::Target => self.model.target = Some(asset),
        }
        self.record(description);
        Ok(())
    }

    fn compute_retarget(&self, source_animation: &str, new_name: &str) -> Result<Animation> {
        let source = self
            .model
            .source
            .as_ref()
            .ok_or_else(|| anyhow!("no source model loaded"))?;
        let target = self
            .model
            .target
            .as_ref()
            .ok_or_else(|| anyhow!("no target model loaded"))?;
        let animation = source.animation(source_animation).ok_or_else(|| {
            anyhow!("source model {} has no animation named {source_animation}", source.name)
        })?;
        if target.animation(new_name).is_some() {
            bail!("target model {} already has an animation named {new_name}", target.name);
        }
        let cfg = RetargetConfig {
            invert_map: self.model.invert_mapping,
            ..self.config.retarget
        };
        retarget_animation(
            animation,
            &source.skeleton,
            &target.skeleton,
            &self.model.mapping,
            &cfg,
            new_name,
        )
        .with_context(|| format!("retarget {source_animation}"))
    }

    fn check_bone(&self, role: Role, bone: &str) -> Result<()> {
        let asset = match role {
            Role::Source => self.model.source.as_ref(),
            Role::Target => self.model.target.as_ref(),
        };
        if let Some(asset) = asset {
            if asset.skeleton.bone_index(bone).is_none() {
                bail!("{} model {} has no bone named {bone}", role.label(), asset.name);
            }
        }
        Ok(())
    }

    /// Key of the stored entry that drives `target_bone`, honouring the
    /// invert flag.
    fn stored_key(&self, target_bone: &str) -> Option<String> {
        if self.model.invert_mapping {
            self.model
                .mapping
                .find_by_source(target_bone)
                .map(|m| m.target().to_string())
        } else {
            self.model
                .mapping
                .get(target_bone)
                .map(|m| m.target().to_string())
        }
    }

    fn before_edit(&mut self) -> Result<()> {
        self.history
            .auto_add(&self.model)
            .context("checkpoint before edit")?;
        Ok(())
    }

    fn record(&mut self, description: String) {
        info!("{description}");
        self.history.add_event(description.clone());
        self.set_status(description);
    }

    fn set_status(&mut self, message: String) {
        self.status = Some(message);
    }

    /// Mirror a failure on the status line before handing it back.
    fn report<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            warn!("{err:#}");
            self.set_status(format!("{err:#}"));
        }
        result
    }
}
