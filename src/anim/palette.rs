use glam::Mat4;

use crate::scene::skeleton::Skeleton;

use super::pose::Pose;

/// Hard capacity of the skinning palette. Skeletons are checked against this
/// when they are built; see [Skeleton].
pub const MAX_BONES: usize = 96;

/// The per-joint skinning matrices for one frame:
/// `palette[i] = globalPose[joint.node] * joint.inverse_bind`.
///
/// Rebuilt every frame the pose changes; a stale palette is a correctness
/// bug, not a caching opportunity.
#[derive(Clone)]
pub struct MatrixPalette {
    matrices: [Mat4; MAX_BONES],
    joint_count: usize,
}

impl Default for MatrixPalette {
    fn default() -> Self {
        Self {
            matrices: [Mat4::IDENTITY; MAX_BONES],
            joint_count: 0,
        }
    }
}

impl MatrixPalette {
    pub fn build(&mut self, pose: &Pose, skeleton: &Skeleton) {
        debug_assert!(skeleton.len() <= MAX_BONES);

        for (entry, joint) in self.matrices.iter_mut().zip(skeleton.joints()) {
            *entry = pose.matrices[joint.node as usize] * joint.inverse_bind;
        }
        self.joint_count = skeleton.len();
    }

    #[inline]
    pub fn joint_count(&self) -> usize {
        self.joint_count
    }

    #[inline]
    pub fn matrix(&self, joint: usize) -> Mat4 {
        self.matrices[joint]
    }

    /// The live entries of the palette.
    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices[..self.joint_count]
    }

    /// Raw bytes of the live entries, for uniform-buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.matrices())
    }
}
