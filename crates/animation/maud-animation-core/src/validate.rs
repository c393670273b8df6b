//! Validation pass for loaded skeletons, animations and mappings.
//!
//! Sampling, posing and retargeting assume data that passed these checks and
//! do not re-validate.

use hashbrown::HashSet;
use log::warn;

use crate::config::ValidationConfig;
use crate::data::{is_reserved_animation_name, Animation, Skeleton, Track, NO_BONE_NAME};
use crate::error::{AnimationError, Result};
use crate::interp::is_unit_quat;
use crate::mapping::SkeletonMapping;

/// Check bone names and parent links.
pub fn validate_skeleton(skeleton: &Skeleton) -> Result<()> {
    let mut names: HashSet<&str> = HashSet::with_capacity(skeleton.len());
    for (index, bone) in skeleton.bones.iter().enumerate() {
        if bone.name.is_empty() {
            return Err(AnimationError::InvalidSkeleton(format!(
                "bone #{index} has an empty name"
            )));
        }
        if bone.name == NO_BONE_NAME {
            return Err(AnimationError::InvalidSkeleton(format!(
                "bone #{index} uses the reserved name '{NO_BONE_NAME}'"
            )));
        }
        if !names.insert(bone.name.as_str()) {
            return Err(AnimationError::InvalidSkeleton(format!(
                "duplicate bone name '{}'",
                bone.name
            )));
        }
        if let Some(parent) = bone.parent {
            if parent >= skeleton.len() {
                return Err(AnimationError::InvalidSkeleton(format!(
                    "bone '{}' has parent index {parent} out of range",
                    bone.name
                )));
            }
        }
    }

    // Any chain longer than the bone count must revisit a bone.
    for (index, bone) in skeleton.bones.iter().enumerate() {
        let mut cursor = bone.parent;
        let mut steps = 0usize;
        while let Some(p) = cursor {
            steps += 1;
            if p == index || steps > skeleton.len() {
                return Err(AnimationError::InvalidSkeleton(format!(
                    "bone '{}' is part of a parent cycle",
                    bone.name
                )));
            }
            cursor = skeleton.parent_of(p);
        }
    }
    Ok(())
}

/// Name rules for animations owned by a model.
pub fn validate_animation_name(name: &str) -> Result<()> {
    if name.is_empty() || is_reserved_animation_name(name) {
        return Err(AnimationError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Check an animation against the skeleton it animates.
pub fn validate_animation(
    animation: &Animation,
    skeleton: &Skeleton,
    cfg: &ValidationConfig,
) -> Result<()> {
    let invalid = |reason: String| AnimationError::InvalidAnimation {
        animation: animation.name.clone(),
        reason,
    };

    validate_animation_name(&animation.name)?;
    if !animation.duration.is_finite() || animation.duration < 0.0 {
        return Err(invalid(format!("duration {} is negative", animation.duration)));
    }

    let mut animated: HashSet<usize> = HashSet::with_capacity(animation.tracks.len());
    for track in &animation.tracks {
        let bone_index = track.target_bone(skeleton).ok_or_else(|| {
            invalid(format!(
                "track targets bone '{}' which is not in the skeleton",
                track.describe_target(skeleton)
            ))
        })?;
        if !animated.insert(bone_index) {
            return Err(invalid(format!(
                "more than one track for bone '{}'",
                skeleton.bones[bone_index].name
            )));
        }
        validate_track(animation, skeleton, track, cfg)?;
    }
    Ok(())
}

fn validate_track(
    animation: &Animation,
    skeleton: &Skeleton,
    track: &Track,
    cfg: &ValidationConfig,
) -> Result<()> {
    let bone = track.describe_target(skeleton);
    let invalid = |reason: String| AnimationError::InvalidTrack {
        animation: animation.name.clone(),
        bone: bone.clone(),
        reason,
    };

    let kf = track.keyframes();
    let n = kf.times.len();
    if n == 0 {
        return Err(invalid("no keyframes".into()));
    }
    if kf.translations.len() != n {
        return Err(invalid(format!(
            "{} translations for {n} keyframe times",
            kf.translations.len()
        )));
    }
    if kf.rotations.len() != n {
        return Err(invalid(format!(
            "{} rotations for {n} keyframe times",
            kf.rotations.len()
        )));
    }
    if let Some(scales) = &kf.scales {
        if scales.len() != n {
            return Err(invalid(format!(
                "{} scales for {n} keyframe times",
                scales.len()
            )));
        }
    }
    if kf.times[0] != 0.0 {
        return Err(invalid(format!(
            "first keyframe at {} instead of 0",
            kf.times[0]
        )));
    }

    let mut prev = 0.0f32;
    for (i, &t) in kf.times.iter().enumerate() {
        if !t.is_finite() {
            return Err(invalid(format!("keyframe {i} has non-finite time")));
        }
        if t < prev {
            return Err(invalid(format!(
                "keyframe {i} at {t} precedes keyframe {} at {prev}",
                i - 1
            )));
        }
        if i > 0 && t == prev {
            warn!(
                "animation '{}' bone '{}': keyframes {} and {i} share time {t}",
                animation.name,
                bone,
                i - 1
            );
        }
        if t > animation.duration {
            return Err(invalid(format!(
                "keyframe {i} at {t} is past the duration {}",
                animation.duration
            )));
        }
        prev = t;
    }

    for (i, q) in kf.rotations.iter().enumerate() {
        if !is_unit_quat(*q, cfg.rotation_tolerance) {
            return Err(invalid(format!("rotation {i} {q:?} is not a unit quaternion")));
        }
    }
    Ok(())
}

/// Check names and twists of every mapping entry.
pub fn validate_mapping(mapping: &SkeletonMapping, rotation_tolerance: f32) -> Result<()> {
    for entry in mapping.iter() {
        if entry.target().is_empty() || entry.source().is_empty() {
            return Err(AnimationError::InvalidMapping(format!(
                "entry '{}' <- '{}' has an empty bone name",
                entry.target(),
                entry.source()
            )));
        }
        if !is_unit_quat(entry.twist(), rotation_tolerance) {
            return Err(AnimationError::InvalidMapping(format!(
                "twist {:?} for target '{}' is not a unit quaternion",
                entry.twist(),
                entry.target()
            )));
        }
    }
    Ok(())
}
