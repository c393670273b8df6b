use serde::{Deserialize, Serialize};

use crate::config::ValidationConfig;
use crate::data::{Animation, Skeleton};
use crate::error::Result;
use crate::interp::IDENTITY_QUAT;
use crate::mapping::{BoneMapping, SkeletonMapping};
use crate::validate::{validate_animation, validate_skeleton};

/// Parse a skeleton asset and validate it.
pub fn parse_skeleton_json(s: &str) -> Result<Skeleton> {
    let skeleton: Skeleton = serde_json::from_str(s)?;
    validate_skeleton(&skeleton)?;
    Ok(skeleton)
}

/// Parse an animation asset and validate it against the skeleton it animates.
///
/// Notes:
/// - Duration and keyframe times are in seconds.
/// - Tracks are tagged `"kind": "bone"` (bone index) or `"kind": "transform"`
///   (bone name).
/// - A missing `scales` array means identity scale.
pub fn parse_animation_json(
    s: &str,
    skeleton: &Skeleton,
    cfg: &ValidationConfig,
) -> Result<Animation> {
    let animation: Animation = serde_json::from_str(s)?;
    validate_animation(&animation, skeleton, cfg)?;
    Ok(animation)
}

/// Parse a bone-mapping asset. Twists are not validated here; retargeting
/// checks them.
pub fn parse_mapping_json(s: &str) -> Result<SkeletonMapping> {
    let stored: StoredMapping = serde_json::from_str(s)?;
    Ok(stored
        .mappings
        .into_iter()
        .map(|e| BoneMapping::new(e.target, e.source, e.twist.unwrap_or(IDENTITY_QUAT)))
        .collect())
}

/// Serialize a bone-mapping table in the asset format, entries in table order.
pub fn mapping_to_json(mapping: &SkeletonMapping) -> Result<String> {
    let stored = StoredMapping {
        mappings: mapping
            .iter()
            .map(|e| StoredEntry {
                target: e.target().to_string(),
                source: e.source().to_string(),
                twist: (e.twist() != IDENTITY_QUAT).then(|| e.twist()),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&stored)?)
}

// ----- mapping JSON schema (serde) -----

#[derive(Debug, Serialize, Deserialize)]
struct StoredMapping {
    mappings: Vec<StoredEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    target: String,
    source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    twist: Option<[f32; 4]>,
}
