use glam::Mat4;

use crate::{anim::palette::MAX_BONES, engine::assets::AssetError};

use super::hierarchy::NodeIndex;

pub type JointIndex = u16;

/// Parent index of a root joint.
pub const JOINT_SENTINEL: JointIndex = JointIndex::MAX;

/// A bone of the skeleton: the hierarchy node it animates with and the
/// matrix taking bind-pose geometry into the joint's local space.
#[derive(Clone, Debug)]
pub struct Joint {
    pub name: String,
    pub node: NodeIndex,
    pub parent: JointIndex,
    pub inverse_bind: Mat4,
}

/// Input for building a skeleton from local bind matrices instead of
/// authored inverse binds.
#[derive(Clone, Debug)]
pub struct JointDef {
    pub name: String,
    pub node: NodeIndex,
    pub parent: JointIndex,
    pub local_bind: Mat4,
}

/// The subset of hierarchy nodes that influence mesh vertices. Immutable
/// after load; the bone count is checked against the palette capacity here,
/// never at palette-build time.
#[derive(Clone, Debug)]
pub struct Skeleton {
    joints: Vec<Joint>,
}

impl Skeleton {
    /// Build from joints whose inverse bind poses the source authored
    /// directly (glTF skins).
    pub fn from_inverse_binds(joints: Vec<Joint>) -> Result<Self, AssetError> {
        if joints.len() > MAX_BONES {
            return Err(AssetError::TooManyBones {
                count: joints.len(),
                max: MAX_BONES,
            });
        }

        Ok(Self { joints })
    }

    /// Build from local bind poses, composing each joint's global bind pose
    /// along its parent chain and inverting. Walks the recorded parent links
    /// explicitly; the joint array may be in any order.
    pub fn from_local_binds(defs: &[JointDef]) -> Result<Self, AssetError> {
        if defs.len() > MAX_BONES {
            return Err(AssetError::TooManyBones {
                count: defs.len(),
                max: MAX_BONES,
            });
        }

        let mut globals: Vec<Option<Mat4>> = vec![None; defs.len()];

        for start in 0..defs.len() {
            // Walk up to the first joint with a resolved global bind, then
            // unwind back down the chain.
            let mut chain = Vec::new();
            let mut index = start;
            loop {
                if globals[index].is_some() {
                    break;
                }
                chain.push(index);
                if chain.len() > defs.len() {
                    return Err(AssetError::InvalidHierarchy(format!(
                        "joint {start} has a cyclic parent chain"
                    )));
                }

                let parent = defs[index].parent;
                if parent == JOINT_SENTINEL {
                    break;
                }
                if parent as usize >= defs.len() {
                    return Err(AssetError::InvalidHierarchy(format!(
                        "joint {index} has out of range parent {parent}"
                    )));
                }
                index = parent as usize;
            }

            for &index in chain.iter().rev() {
                let parent = defs[index].parent;
                let parent_global = if parent == JOINT_SENTINEL {
                    Mat4::IDENTITY
                } else {
                    globals[parent as usize].expect("parent resolved before child")
                };
                globals[index] = Some(parent_global * defs[index].local_bind);
            }
        }

        let joints = defs
            .iter()
            .zip(globals)
            .map(|(def, global)| Joint {
                name: def.name.clone(),
                node: def.node,
                parent: def.parent,
                inverse_bind: global.expect("all joints resolved").inverse(),
            })
            .collect();

        Ok(Self { joints })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn approx_m4(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    #[test]
    fn inverse_bind_chain_from_local_binds() {
        // Child stored before its parent to prove no order assumption.
        let defs = vec![
            JointDef {
                name: "child".to_string(),
                node: 1,
                parent: 1,
                local_bind: Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)),
            },
            JointDef {
                name: "root".to_string(),
                node: 0,
                parent: JOINT_SENTINEL,
                local_bind: Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)),
            },
        ];

        let skeleton = Skeleton::from_local_binds(&defs).unwrap();

        let root = &skeleton.joints()[1];
        assert!(approx_m4(
            root.inverse_bind,
            Mat4::from_translation(Vec3::new(-1.0, 0.0, 0.0))
        ));

        // Child global bind is root * child local.
        let child = &skeleton.joints()[0];
        assert!(approx_m4(
            child.inverse_bind,
            Mat4::from_translation(Vec3::new(-1.0, -1.0, 0.0))
        ));
    }

    #[test]
    fn rejects_too_many_bones() {
        let joints = (0..MAX_BONES + 1)
            .map(|i| Joint {
                name: format!("bone{i}"),
                node: i as NodeIndex,
                parent: JOINT_SENTINEL,
                inverse_bind: Mat4::IDENTITY,
            })
            .collect();

        assert!(matches!(
            Skeleton::from_inverse_binds(joints),
            Err(AssetError::TooManyBones { .. })
        ));
    }

    #[test]
    fn rejects_cyclic_parent_chain() {
        let defs = vec![
            JointDef {
                name: "a".to_string(),
                node: 0,
                parent: 1,
                local_bind: Mat4::IDENTITY,
            },
            JointDef {
                name: "b".to_string(),
                node: 1,
                parent: 0,
                local_bind: Mat4::IDENTITY,
            },
        ];

        assert!(matches!(
            Skeleton::from_local_binds(&defs),
            Err(AssetError::InvalidHierarchy(_))
        ));
    }
}
