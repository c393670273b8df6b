//! Per-bone user transforms for one skeleton instance.
//!
//! A bone's local transform is its bind transform combined with its user
//! transform: translations add, rotations compose `bind × user`, scales
//! multiply. Model-space orientation composes local rotations from the bone up
//! to its root.

use crate::data::{Animation, Skeleton, Transform};
use crate::interp::{mul_vec3, quat_inverse, quat_mul, IDENTITY_QUAT};
use crate::mapping::SkeletonMapping;
use crate::sampling::sample_track;

#[derive(Clone, Debug, PartialEq)]
pub struct Pose {
    user: Vec<Transform>,
}

impl Pose {
    /// Bind pose for `skeleton` (every user transform is identity).
    pub fn bind(skeleton: &Skeleton) -> Self {
        Self {
            user: vec![Transform::IDENTITY; skeleton.len()],
        }
    }

    pub fn bone_count(&self) -> usize {
        self.user.len()
    }

    pub fn set_to_bind(&mut self) {
        self.user.fill(Transform::IDENTITY);
    }

    /// Pose the skeleton as `animation` has it at `time`. Bones without a
    /// track stay in bind pose.
    pub fn set_to_animation(&mut self, animation: &Animation, skeleton: &Skeleton, time: f32) {
        self.set_to_bind();
        for track in &animation.tracks {
            if let Some(index) = track.target_bone(skeleton) {
                if let Some(slot) = self.user.get_mut(index) {
                    *slot = sample_track(track, time);
                }
            }
        }
    }

    pub fn user_transform(&self, bone: usize) -> Transform {
        self.user[bone]
    }

    pub fn set_user_transform(&mut self, bone: usize, transform: Transform) {
        self.user[bone] = transform;
    }

    pub fn set_user_rotation(&mut self, bone: usize, rotation: [f32; 4]) {
        self.user[bone].rotation = rotation;
    }

    /// Bind transform combined with the user transform.
    pub fn local_transform(&self, skeleton: &Skeleton, bone: usize) -> Transform {
        let bind = &skeleton.bones[bone].bind;
        let user = &self.user[bone];
        Transform {
            translation: [
                bind.translation[0] + user.translation[0],
                bind.translation[1] + user.translation[1],
                bind.translation[2] + user.translation[2],
            ],
            rotation: quat_mul(bind.rotation, user.rotation),
            scale: mul_vec3(bind.scale, user.scale),
        }
    }

    fn local_rotation(&self, skeleton: &Skeleton, bone: usize) -> [f32; 4] {
        quat_mul(skeleton.bones[bone].bind.rotation, self.user[bone].rotation)
    }

    /// Orientation of `bone` relative to the model (root) frame.
    pub fn model_orientation(&self, skeleton: &Skeleton, bone: usize) -> [f32; 4] {
        let mut orientation = self.local_rotation(skeleton, bone);
        let mut cursor = skeleton.parent_of(bone);
        // bounded by the bone count in case the parent links loop
        let mut remaining = skeleton.len();
        while let Some(parent) = cursor {
            if remaining == 0 {
                break;
            }
            orientation = quat_mul(self.local_rotation(skeleton, parent), orientation);
            cursor = skeleton.parent_of(parent);
            remaining -= 1;
        }
        orientation
    }

    /// User rotation that gives `bone` the model-space `orientation`, with the
    /// rest of this pose unchanged.
    pub fn user_for_model(
        &self,
        skeleton: &Skeleton,
        bone: usize,
        orientation: [f32; 4],
    ) -> [f32; 4] {
        let parent_orientation = match skeleton.parent_of(bone) {
            Some(parent) => self.model_orientation(skeleton, parent),
            None => IDENTITY_QUAT,
        };
        let local = quat_mul(quat_inverse(parent_orientation), orientation);
        quat_mul(quat_inverse(skeleton.bones[bone].bind.rotation), local)
    }

    /// Pose this (target) skeleton to match `source_pose` through `mapping`.
    ///
    /// Parents are visited before children so each mapped bone is solved
    /// against its already-retargeted parent. Mapped bones get
    /// `user_for_model(source orientation) × twist`; everything else resets to
    /// identity, including bones whose source bone is missing.
    pub fn set_to_retarget(
        &mut self,
        target: &Skeleton,
        source_pose: &Pose,
        source: &Skeleton,
        mapping: &SkeletonMapping,
    ) {
        self.set_to_bind();
        for index in target.parents_first_order() {
            let Some(entry) = mapping.get(&target.bones[index].name) else {
                continue;
            };
            let Some(source_index) = source.bone_index(entry.source()) else {
                continue;
            };
            let orientation = source_pose.model_orientation(source, source_index);
            let user = self.user_for_model(target, index, orientation);
            self.user[index].rotation = quat_mul(user, entry.twist());
        }
    }
}
