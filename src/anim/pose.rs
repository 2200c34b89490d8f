use glam::{Mat4, Vec3};

use crate::scene::hierarchy::{Hierarchy, NODE_SENTINEL, Node, NodeIndex};

use super::clip::Clip;

/// One matrix per hierarchy node, index-aligned with the node array.
#[derive(Clone, Debug, Default)]
pub struct Pose {
    pub matrices: Vec<Mat4>,
}

impl Pose {
    #[inline]
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Position of every node, the origin of each matrix. For a global pose
    /// this is the joint point cloud used for skeleton visualization.
    pub fn node_positions(&self) -> Vec<Vec3> {
        self.matrices
            .iter()
            .map(|matrix| matrix.w_axis.truncate())
            .collect()
    }
}

fn sample_local(clip: &Clip, index: NodeIndex, node: &Node, time: f32, looping: bool) -> Mat4 {
    let rest = &node.transform;

    match clip.channels_for(index) {
        None => rest.to_mat4(),
        Some(channels) => {
            let translation = channels
                .translations
                .sample(time, looping)
                .unwrap_or(rest.translation);
            let rotation = channels
                .rotations
                .sample(time, looping)
                .unwrap_or(rest.rotation);
            let scale = channels.scales.sample(time, looping).unwrap_or(rest.scale);

            Mat4::from_scale_rotation_translation(scale, rotation, translation)
        }
    }
}

/// Sample every node's local transform at `time` without composing parents.
pub fn evaluate_local_pose(clip: &Clip, hierarchy: &Hierarchy, time: f32, looping: bool) -> Pose {
    let matrices = hierarchy
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| sample_local(clip, index as NodeIndex, node, time, looping))
        .collect();

    Pose { matrices }
}

/// Sample every node at `time` and compose local transforms down the tree
/// into model-space matrices.
///
/// The walk follows the hierarchy's cached traversal order, so a parent's
/// global matrix is always in place before its children read it. The whole
/// hierarchy is evaluated, not just skinned joints; descendants may hang off
/// nodes that influence no vertices.
pub fn evaluate_global_pose(clip: &Clip, hierarchy: &Hierarchy, time: f32, looping: bool) -> Pose {
    let mut matrices = vec![Mat4::IDENTITY; hierarchy.len()];

    for &index in hierarchy.traversal_order() {
        let node = hierarchy.node(index);
        let local = sample_local(clip, index, node, time, looping);

        matrices[index as usize] = if node.parent == NODE_SENTINEL {
            local
        } else {
            matrices[node.parent as usize] * local
        };
    }

    Pose { matrices }
}
