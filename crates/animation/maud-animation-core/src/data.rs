//! Skeletal animation data model: skeletons, keyframed tracks and animations.
//!
//! Bones live in an arena (`Skeleton::bones`) and refer to their parent by
//! index, so walking toward the root is an index-following loop.

use serde::{Deserialize, Serialize};

use crate::interp::IDENTITY_QUAT;

/// Name of the pseudo-animation that shows the bind pose.
pub const BIND_POSE_NAME: &str = "( bind pose )";
/// Name of the pseudo-animation that shows a retargeted pose.
pub const RETARGETED_POSE_NAME: &str = "( retargeted pose )";
/// Sentinel meaning "no bone selected"; never a valid bone name.
pub const NO_BONE_NAME: &str = "( no bone )";

/// True for names reserved by the editor for pseudo-animations.
pub fn is_reserved_animation_name(name: &str) -> bool {
    name == BIND_POSE_NAME || name == RETARGETED_POSE_NAME
}

/// Translation, rotation (`[x, y, z, w]`) and scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub translation: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: [0.0, 0.0, 0.0],
        rotation: IDENTITY_QUAT,
        scale: [1.0, 1.0, 1.0],
    };

    pub fn from_rotation(rotation: [f32; 4]) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    pub fn from_translation(translation: [f32; 3]) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A named joint with an optional parent and a bind-pose local transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    #[serde(default)]
    pub parent: Option<usize>,
    #[serde(default)]
    pub bind: Transform,
}

impl Bone {
    pub fn root(name: impl Into<String>, bind: Transform) -> Self {
        Self {
            name: name.into(),
            parent: None,
            bind,
        }
    }

    pub fn child(name: impl Into<String>, parent: usize, bind: Transform) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent),
            bind,
        }
    }
}

/// Arena of bones. Several roots are allowed; bone order need not be
/// topological.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    pub bones: Vec<Bone>,
}

impl Skeleton {
    pub fn new(bones: Vec<Bone>) -> Self {
        Self { bones }
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.bones.get(index).and_then(|b| b.parent)
    }

    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.bones
            .iter()
            .enumerate()
            .filter(|(_, b)| b.parent.is_none())
            .map(|(i, _)| i)
    }

    pub fn children_of(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.bones
            .iter()
            .enumerate()
            .filter(move |(_, b)| b.parent == Some(index))
            .map(|(i, _)| i)
    }

    /// Bone indices ordered so every parent precedes its children
    /// (depth-first from each root, roots in index order). Bones caught in a
    /// parent cycle are unreachable from any root and are left out.
    pub fn parents_first_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.bones.len());
        let mut stack: Vec<usize> = self.roots().collect();
        stack.reverse();
        while let Some(index) = stack.pop() {
            order.push(index);
            let mut children: Vec<usize> = self.children_of(index).collect();
            children.reverse();
            stack.extend(children);
        }
        order
    }
}

/// Keyframe times with parallel per-frame arrays.
///
/// `scales == None` means identity scale at every frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Keyframes {
    pub times: Vec<f32>,
    pub translations: Vec<[f32; 3]>,
    pub rotations: Vec<[f32; 4]>,
    #[serde(default)]
    pub scales: Option<Vec<[f32; 3]>>,
}

impl Keyframes {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Transform stored at frame `index`.
    pub fn frame(&self, index: usize) -> Transform {
        Transform {
            translation: self.translations[index],
            rotation: self.rotations[index],
            scale: self
                .scales
                .as_ref()
                .map(|s| s[index])
                .unwrap_or(Transform::IDENTITY.scale),
        }
    }

    /// Build keyframes from a list of `(time, transform)` frames.
    pub fn from_frames(frames: &[(f32, Transform)]) -> Self {
        let with_scale = frames
            .iter()
            .any(|(_, t)| t.scale != Transform::IDENTITY.scale);
        Self {
            times: frames.iter().map(|(t, _)| *t).collect(),
            translations: frames.iter().map(|(_, x)| x.translation).collect(),
            rotations: frames.iter().map(|(_, x)| x.rotation).collect(),
            scales: with_scale.then(|| frames.iter().map(|(_, x)| x.scale).collect()),
        }
    }

    /// Keyframe times with repeats removed, in order.
    pub fn distinct_times(&self) -> Vec<f32> {
        let mut out: Vec<f32> = Vec::with_capacity(self.times.len());
        for &t in &self.times {
            if out.last() != Some(&t) {
                out.push(t);
            }
        }
        out
    }
}

/// Track addressing its bone by index (legacy representation).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneTrack {
    pub bone: usize,
    pub keyframes: Keyframes,
}

/// Track addressing its bone (joint) by name (clip representation).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformTrack {
    pub target: String,
    pub keyframes: Keyframes,
}

/// Either track representation; everything downstream works through
/// [`Track::target_bone`] and [`Track::keyframes`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Track {
    Bone(BoneTrack),
    Transform(TransformTrack),
}

impl Track {
    pub fn bone(bone: usize, keyframes: Keyframes) -> Self {
        Track::Bone(BoneTrack { bone, keyframes })
    }

    pub fn transform(target: impl Into<String>, keyframes: Keyframes) -> Self {
        Track::Transform(TransformTrack {
            target: target.into(),
            keyframes,
        })
    }

    pub fn keyframes(&self) -> &Keyframes {
        match self {
            Track::Bone(t) => &t.keyframes,
            Track::Transform(t) => &t.keyframes,
        }
    }

    /// Index of the animated bone in `skeleton`, if it exists there.
    pub fn target_bone(&self, skeleton: &Skeleton) -> Option<usize> {
        match self {
            Track::Bone(t) => (t.bone < skeleton.len()).then_some(t.bone),
            Track::Transform(t) => skeleton.bone_index(&t.target),
        }
    }

    /// Human-readable target, for messages.
    pub fn describe_target(&self, skeleton: &Skeleton) -> String {
        match self {
            Track::Bone(t) => skeleton
                .bone(t.bone)
                .map(|b| b.name.clone())
                .unwrap_or_else(|| format!("#{}", t.bone)),
            Track::Transform(t) => t.target.clone(),
        }
    }
}

/// A named clip: a duration in seconds and at most one track per bone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub name: String,
    pub duration: f32,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Animation {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            tracks: Vec::new(),
        }
    }

    pub fn with_track(mut self, track: Track) -> Self {
        self.tracks.push(track);
        self
    }

    /// Track animating bone `bone_index` of `skeleton`.
    pub fn track_for_bone(&self, skeleton: &Skeleton, bone_index: usize) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|t| t.target_bone(skeleton) == Some(bone_index))
    }
}
