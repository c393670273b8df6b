//! Maud animation core
//!
//! Skeletons, keyframed tracks and animations, the validation pass run on
//! loaded data, track sampling, poses (model-space vs. user-space rotation),
//! the bone-mapping table and the retargeting engine built on them.

pub mod config;
pub mod data;
pub mod error;
pub mod interp;
pub mod mapping;
pub mod pose;
pub mod retarget;
pub mod sampling;
pub mod stored_animation;
pub mod validate;

// Re-exports for consumers
pub use config::{RetargetConfig, ValidationConfig};
pub use data::{
    Animation, Bone, BoneTrack, Keyframes, Skeleton, Track, Transform, TransformTrack,
    BIND_POSE_NAME, NO_BONE_NAME, RETARGETED_POSE_NAME,
};
pub use error::{AnimationError, Result};
pub use mapping::{BoneMapping, SkeletonMapping};
pub use pose::Pose;
pub use retarget::{retarget_animation, retarget_track};
pub use sampling::{sample_keyframes, sample_track};
pub use stored_animation::{
    mapping_to_json, parse_animation_json, parse_mapping_json, parse_skeleton_json,
};
pub use validate::{validate_animation, validate_mapping, validate_skeleton};
