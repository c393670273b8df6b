//! Error type shared by validation, mapping and retargeting.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnimationError {
    #[error("invalid skeleton: {0}")]
    InvalidSkeleton(String),

    #[error("invalid animation '{animation}': {reason}")]
    InvalidAnimation { animation: String, reason: String },

    #[error("invalid track for bone '{bone}' in animation '{animation}': {reason}")]
    InvalidTrack {
        animation: String,
        bone: String,
        reason: String,
    },

    #[error("invalid bone mapping: {0}")]
    InvalidMapping(String),

    /// Two entries share a source bone, so the inverted table would map one
    /// target twice.
    #[error("inverted mapping is ambiguous: bone '{bone}' is the source of more than one entry")]
    MappingConflict { bone: String },

    #[error("invalid animation name '{0}'")]
    InvalidName(String),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnimationError>;
