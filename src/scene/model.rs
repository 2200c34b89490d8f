use std::path::Path;

use ahash::HashMap;

use crate::{
    anim::clip::{ChannelSet, Clip},
    engine::prelude::*,
    import::{self, RawDocument},
};

use super::{
    hierarchy::{Hierarchy, Node, NodeIndex},
    skeleton::{JOINT_SENTINEL, Joint, Skeleton},
    skinning::VertexInfluences,
};

/// Geometry of one mesh of a model. Positions are the immutable rest pose;
/// per-frame skinned positions live on the instance.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub indices: Vec<u32>,
    pub influences: Vec<VertexInfluences>,
}

impl Mesh {
    pub fn is_skinned(&self) -> bool {
        !self.influences.is_empty()
    }
}

/// An imported asset: hierarchy, optional skeleton, geometry and clips.
/// Immutable after load and shareable between any number of instances.
#[derive(Debug)]
pub struct Model {
    pub hierarchy: Hierarchy,
    pub skeleton: Option<Skeleton>,
    pub meshes: Vec<Mesh>,
    clips: Vec<Clip>,
    clip_lookup: HashMap<String, usize>,
}

impl Model {
    pub fn new(
        hierarchy: Hierarchy,
        skeleton: Option<Skeleton>,
        meshes: Vec<Mesh>,
        clips: Vec<Clip>,
    ) -> Self {
        let clip_lookup = clips
            .iter()
            .enumerate()
            .map(|(index, clip)| (clip.name().to_string(), index))
            .collect();

        Self {
            hierarchy,
            skeleton,
            meshes,
            clips,
            clip_lookup,
        }
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn clip(&self, index: usize) -> Option<&Clip> {
        self.clips.get(index)
    }

    pub fn clip_index(&self, name: &str) -> Option<usize> {
        self.clip_lookup.get(name).copied()
    }

    pub fn clip_names(&self) -> Vec<&str> {
        self.clips.iter().map(Clip::name).collect()
    }
}

impl TryFrom<RawDocument> for Model {
    type Error = AssetError;

    fn try_from(document: RawDocument) -> Result<Self, Self::Error> {
        let node_count = document.nodes.len();

        let hierarchy = Hierarchy::from_nodes(
            document
                .nodes
                .into_iter()
                .map(|raw| {
                    Node::new(
                        raw.name,
                        raw.parent,
                        Transform::new(raw.translation, raw.rotation, raw.scale),
                    )
                })
                .collect(),
        )?;

        let skeleton = match document.skin {
            Some(skin) => {
                let mut joints = Vec::with_capacity(skin.joints.len());
                for raw in skin.joints {
                    if raw.node as usize >= node_count {
                        return Err(AssetError::InvalidHierarchy(format!(
                            "joint {} targets missing node {}",
                            raw.name, raw.node
                        )));
                    }
                    joints.push(Joint {
                        name: raw.name,
                        node: raw.node,
                        parent: JOINT_SENTINEL,
                        inverse_bind: raw.inverse_bind,
                    });
                }
                Some(Skeleton::from_inverse_binds(joints)?)
            }
            None => None,
        };
        let joint_count = skeleton.as_ref().map_or(0, Skeleton::len);

        let mut clips = Vec::with_capacity(document.clips.len());
        for raw_clip in document.clips {
            let mut channels: HashMap<NodeIndex, ChannelSet> = HashMap::default();

            for channel in raw_clip.channels {
                if channel.target as usize >= node_count {
                    // A channel aimed at a node we never loaded; drop it and
                    // keep the rest of the clip.
                    tracing::warn!(
                        "Clip {}: channel targets missing node {}, skipping",
                        raw_clip.name,
                        channel.target
                    );
                    continue;
                }

                let set = channels.entry(channel.target).or_default();
                for (time, value) in channel.translations {
                    set.translations.insert(time, value);
                }
                for (time, value) in channel.rotations {
                    set.rotations.insert(time, value);
                }
                for (time, value) in channel.scales {
                    set.scales.insert(time, value);
                }
            }

            clips.push(Clip::new(raw_clip.name, channels));
        }

        let mut meshes = Vec::with_capacity(document.meshes.len());
        for raw in document.meshes {
            if !raw.influences.is_empty() {
                if raw.influences.len() != raw.positions.len() {
                    return Err(AssetError::Custom(format!(
                        "Mesh {}: {} influence entries for {} vertices",
                        raw.name,
                        raw.influences.len(),
                        raw.positions.len()
                    )));
                }
                if let Some(vertex) = raw
                    .influences
                    .iter()
                    .find(|v| v.joints.iter().any(|&j| j as usize >= joint_count))
                {
                    return Err(AssetError::Custom(format!(
                        "Mesh {}: vertex references joint {} of {}",
                        raw.name,
                        vertex.joints.iter().max().unwrap(),
                        joint_count
                    )));
                }
            }

            meshes.push(Mesh {
                name: raw.name,
                positions: raw.positions,
                normals: raw.normals,
                tex_coords: raw.tex_coords,
                indices: raw.indices,
                influences: raw.influences,
            });
        }

        Ok(Model::new(hierarchy, skeleton, meshes, clips))
    }
}

/// Shared storage for loaded models. Instances refer to entries by handle;
/// loading the same path twice returns the cached handle.
pub struct Models {
    models: Storage<Model>,
    lookup: HashMap<String, Handle<Model>>,
}

impl Default for Models {
    fn default() -> Self {
        Self {
            models: Storage::default(),
            lookup: HashMap::default(),
        }
    }
}

impl Models {
    pub fn get(&self, handle: Handle<Model>) -> Option<&Model> {
        self.models.get(handle)
    }

    pub fn insert(&mut self, model: Model) -> Handle<Model> {
        self.models.insert(model)
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Handle<Model>, AssetError> {
        let key = path.as_ref().to_string_lossy().to_string();
        if let Some(handle) = self.lookup.get(&key) {
            return Ok(*handle);
        }

        let document = import::gltf::load(path.as_ref())?;
        let model = Model::try_from(document)?;

        tracing::info!(
            "Loaded model {}: {} nodes, {} joints, {} meshes, {} clips",
            key,
            model.hierarchy.len(),
            model.skeleton.as_ref().map_or(0, Skeleton::len),
            model.meshes.len(),
            model.clips().len()
        );

        let handle = self.models.insert(model);
        self.lookup.insert(key, handle);
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        import::{RawChannel, RawClip, RawJoint, RawMesh, RawNode, RawSkin},
        scene::hierarchy::NODE_SENTINEL,
    };
    use glam::{Mat4, Quat};

    fn raw_node(name: &str, parent: NodeIndex) -> RawNode {
        RawNode {
            name: name.to_string(),
            parent,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    fn two_node_document() -> RawDocument {
        RawDocument {
            nodes: vec![raw_node("root", NODE_SENTINEL), raw_node("arm", 0)],
            ..RawDocument::default()
        }
    }

    #[test]
    fn builds_model_from_document() {
        let mut document = two_node_document();
        document.skin = Some(RawSkin {
            joints: vec![RawJoint {
                name: "arm".to_string(),
                node: 1,
                inverse_bind: Mat4::IDENTITY,
            }],
        });

        let mut channel = RawChannel::new(1);
        channel.translations = vec![(0.0, Vec3::ZERO), (1.0, Vec3::X)];
        document.clips.push(RawClip {
            name: "wave".to_string(),
            channels: vec![channel],
        });

        let model = Model::try_from(document).unwrap();
        assert_eq!(model.hierarchy.len(), 2);
        assert_eq!(model.skeleton.as_ref().unwrap().len(), 1);
        assert_eq!(model.clip_index("wave"), Some(0));
        assert_eq!(model.clips()[0].duration(), 1.0);
    }

    #[test]
    fn channel_with_missing_target_is_skipped() {
        let mut document = two_node_document();
        let mut good = RawChannel::new(0);
        good.translations = vec![(0.0, Vec3::ZERO), (2.0, Vec3::X)];
        let mut bad = RawChannel::new(42);
        bad.translations = vec![(0.0, Vec3::ZERO), (5.0, Vec3::X)];
        document.clips.push(RawClip {
            name: "partial".to_string(),
            channels: vec![good, bad],
        });

        let model = Model::try_from(document).unwrap();
        let clip = &model.clips()[0];
        assert!(clip.channels_for(0).is_some());
        assert!(clip.channels_for(42).is_none());
        // The skipped channel contributes nothing to the time range.
        assert_eq!(clip.duration(), 2.0);
    }

    #[test]
    fn rejects_influences_out_of_joint_range() {
        let mut document = two_node_document();
        document.skin = Some(RawSkin {
            joints: vec![RawJoint {
                name: "arm".to_string(),
                node: 1,
                inverse_bind: Mat4::IDENTITY,
            }],
        });
        document.meshes.push(RawMesh {
            name: "quad".to_string(),
            positions: vec![Vec3::ZERO],
            influences: vec![VertexInfluences {
                joints: [3, 0, 0, 0],
                weights: [1.0, 0.0, 0.0, 0.0],
            }],
            ..RawMesh::default()
        });

        assert!(matches!(
            Model::try_from(document),
            Err(AssetError::Custom(_))
        ));
    }

    #[test]
    fn rejects_influence_count_mismatch() {
        let mut document = two_node_document();
        document.skin = Some(RawSkin {
            joints: vec![RawJoint {
                name: "arm".to_string(),
                node: 1,
                inverse_bind: Mat4::IDENTITY,
            }],
        });
        document.meshes.push(RawMesh {
            name: "quad".to_string(),
            positions: vec![Vec3::ZERO, Vec3::X],
            influences: vec![VertexInfluences::default()],
            ..RawMesh::default()
        });

        assert!(matches!(
            Model::try_from(document),
            Err(AssetError::Custom(_))
        ));
    }
}
