//! Retargeting: re-express an animation authored for one skeleton on another.
//!
//! For each target bone with a mapping entry whose source bone exists, a
//! track is produced on the keyframe timeline of that source bone's track (a
//! single frame at 0 when the source bone is not animated). At every sample
//! time the source skeleton is posed from the animation, the target skeleton
//! is posed through the mapping (see [`Pose::set_to_retarget`]) and the target
//! bone's user transform is recorded. Only orientation carries over:
//! translations stay at bind and scale stays identity.
//!
//! Target bones therefore may end up with different keyframe times within one
//! output animation.

use log::debug;

use crate::config::RetargetConfig;
use crate::data::{Animation, Keyframes, Skeleton, Track};
use crate::error::Result;
use crate::mapping::SkeletonMapping;
use crate::pose::Pose;
use crate::validate::{validate_animation_name, validate_mapping};

/// Retarget `source_animation` from `source` onto `target`.
///
/// Fails without producing anything when `new_name` is empty or reserved, a
/// twist is not a unit quaternion, or the inverted table is ambiguous.
/// Unmapped target bones and mappings naming a missing source bone are
/// skipped.
pub fn retarget_animation(
    source_animation: &Animation,
    source: &Skeleton,
    target: &Skeleton,
    mapping: &SkeletonMapping,
    cfg: &RetargetConfig,
    new_name: &str,
) -> Result<Animation> {
    validate_animation_name(new_name)?;
    let mapping = mapping.effective(cfg.invert_map)?;
    validate_mapping(&mapping, cfg.rotation_tolerance)?;

    let mut cache = PoseCache::new(source_animation, source, target, &mapping);
    let mut out = Animation::new(new_name, source_animation.duration);
    for index in 0..target.len() {
        if let Some(times) = cache.sample_times(index) {
            out.tracks.push(cache.build_track(index, &times));
        }
    }
    debug!(
        "retargeted '{}' as '{}': {} of {} target bones animated, {} poses solved",
        source_animation.name,
        new_name,
        out.tracks.len(),
        target.len(),
        cache.solved.len()
    );
    Ok(out)
}

/// Retarget the single target bone `target_bone`. `Ok(None)` when that bone
/// has no usable mapping.
pub fn retarget_track(
    source_animation: &Animation,
    source: &Skeleton,
    target: &Skeleton,
    mapping: &SkeletonMapping,
    cfg: &RetargetConfig,
    target_bone: usize,
) -> Result<Option<Track>> {
    let mapping = mapping.effective(cfg.invert_map)?;
    validate_mapping(&mapping, cfg.rotation_tolerance)?;
    if target_bone >= target.len() {
        return Ok(None);
    }
    let mut cache = PoseCache::new(source_animation, source, target, &mapping);
    Ok(cache
        .sample_times(target_bone)
        .map(|times| cache.build_track(target_bone, &times)))
}

/// Target poses solved so far for one call, keyed by sample time.
struct PoseCache<'a> {
    animation: &'a Animation,
    source: &'a Skeleton,
    target: &'a Skeleton,
    mapping: &'a SkeletonMapping,
    source_pose: Pose,
    solved: Vec<(f32, Pose)>,
}

impl<'a> PoseCache<'a> {
    fn new(
        animation: &'a Animation,
        source: &'a Skeleton,
        target: &'a Skeleton,
        mapping: &'a SkeletonMapping,
    ) -> Self {
        Self {
            animation,
            source,
            target,
            mapping,
            source_pose: Pose::bind(source),
            solved: Vec::new(),
        }
    }

    /// Sample times for target bone `index`, or `None` to skip the bone.
    fn sample_times(&self, index: usize) -> Option<Vec<f32>> {
        let name = &self.target.bones[index].name;
        let entry = self.mapping.get(name)?;
        let Some(source_index) = self.source.bone_index(entry.source()) else {
            debug!(
                "skipping target bone '{}': source bone '{}' not in source skeleton",
                name,
                entry.source()
            );
            return None;
        };
        let times = self
            .animation
            .track_for_bone(self.source, source_index)
            .map(|t| t.keyframes().distinct_times())
            .filter(|times| !times.is_empty())
            .unwrap_or_else(|| vec![0.0]);
        Some(times)
    }

    fn pose_at(&mut self, time: f32) -> &Pose {
        let slot = match self.solved.binary_search_by(|(t, _)| t.total_cmp(&time)) {
            Ok(i) => i,
            Err(i) => {
                self.source_pose
                    .set_to_animation(self.animation, self.source, time);
                let mut pose = Pose::bind(self.target);
                pose.set_to_retarget(self.target, &self.source_pose, self.source, self.mapping);
                self.solved.insert(i, (time, pose));
                i
            }
        };
        &self.solved[slot].1
    }

    fn build_track(&mut self, index: usize, times: &[f32]) -> Track {
        let mut translations = Vec::with_capacity(times.len());
        let mut rotations = Vec::with_capacity(times.len());
        for &time in times {
            let user = self.pose_at(time).user_transform(index);
            translations.push(user.translation);
            rotations.push(user.rotation);
        }
        Track::bone(
            index,
            Keyframes {
                times: times.to_vec(),
                translations,
                rotations,
                scales: None,
            },
        )
    }
}
