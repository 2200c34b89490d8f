use std::path::Path;

use glam::{Mat4, Quat, Vec2, Vec3};
use gltf::animation::util::ReadOutputs;

use crate::{
    engine::assets::AssetError,
    scene::{
        hierarchy::{NODE_SENTINEL, NodeIndex},
        skinning::VertexInfluences,
    },
};

use super::{RawChannel, RawClip, RawDocument, RawJoint, RawMesh, RawNode, RawSkin};

/// Import a `.gltf`/`.glb` file (plus side-car buffers) into the normalized
/// document representation.
pub fn load(path: impl AsRef<Path>) -> Result<RawDocument, AssetError> {
    let (document, buffers, _images) = gltf::import(path.as_ref())?;
    from_gltf(&document, &buffers)
}

/// Import from an in-memory glTF/GLB blob.
pub fn load_slice(data: &[u8]) -> Result<RawDocument, AssetError> {
    let (document, buffers, _images) = gltf::import_slice(data)?;
    from_gltf(&document, &buffers)
}

fn from_gltf(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<RawDocument, AssetError> {
    let nodes = load_nodes(document);
    let skin = load_skin(document, buffers);
    let clips = load_clips(document, buffers);
    let meshes = load_meshes(document, buffers);

    Ok(RawDocument {
        nodes,
        skin,
        clips,
        meshes,
    })
}

/// Flatten the node graph into a parent-indexed list. glTF scenes may have
/// several parentless nodes; those get gathered under a synthetic root so
/// the hierarchy stays single-rooted.
fn load_nodes(document: &gltf::Document) -> Vec<RawNode> {
    let node_count = document.nodes().len();

    let mut parents = vec![NODE_SENTINEL; node_count];
    for node in document.nodes() {
        for child in node.children() {
            parents[child.index()] = node.index() as NodeIndex;
        }
    }

    let mut nodes: Vec<RawNode> = document
        .nodes()
        .map(|node| {
            let (translation, rotation, scale) = node.transform().decomposed();
            RawNode {
                name: node.name().unwrap_or_default().to_string(),
                parent: parents[node.index()],
                translation: Vec3::from(translation),
                rotation: Quat::from_array(rotation),
                scale: Vec3::from(scale),
            }
        })
        .collect();

    let roots: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.parent == NODE_SENTINEL)
        .map(|(index, _)| index)
        .collect();

    if roots.len() > 1 {
        let synthetic = nodes.len() as NodeIndex;
        for index in roots {
            nodes[index].parent = synthetic;
        }
        nodes.push(RawNode {
            name: "scene".to_string(),
            parent: NODE_SENTINEL,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        });
    }

    nodes
}

fn load_skin(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Option<RawSkin> {
    let skin = document.skins().next()?;
    if document.skins().count() > 1 {
        tracing::warn!("Multiple skins in document, using the first");
    }

    let reader = skin.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
    let inverse_binds: Vec<Mat4> = reader
        .read_inverse_bind_matrices()
        .map(|matrices| matrices.map(|m| Mat4::from_cols_array_2d(&m)).collect())
        .unwrap_or_default();

    let joints = skin
        .joints()
        .enumerate()
        .map(|(index, node)| RawJoint {
            name: node.name().unwrap_or_default().to_string(),
            node: node.index() as NodeIndex,
            // Bind pose equals rest pose when the matrices are absent.
            inverse_bind: inverse_binds.get(index).copied().unwrap_or(Mat4::IDENTITY),
        })
        .collect();

    Some(RawSkin { joints })
}

fn load_clips(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Vec<RawClip> {
    document
        .animations()
        .enumerate()
        .map(|(index, animation)| {
            let name = match animation.name() {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => format!("animation{index}"),
            };

            let mut channels: Vec<RawChannel> = Vec::new();

            for channel in animation.channels() {
                if channel.sampler().interpolation()
                    == gltf::animation::Interpolation::CubicSpline
                {
                    tracing::warn!("Clip {name}: cubic spline sampler not supported, skipping");
                    continue;
                }

                let target = channel.target().node().index() as NodeIndex;
                let reader = channel
                    .reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

                let Some(times) = reader.read_inputs() else {
                    tracing::warn!("Clip {name}: channel has no key times, skipping");
                    continue;
                };
                let times: Vec<f32> = times.collect();

                let entry = match channels.iter().position(|c| c.target == target) {
                    Some(index) => &mut channels[index],
                    None => {
                        channels.push(RawChannel::new(target));
                        channels.last_mut().unwrap()
                    }
                };

                match reader.read_outputs() {
                    Some(ReadOutputs::Translations(values)) => {
                        entry
                            .translations
                            .extend(times.iter().copied().zip(values.map(Vec3::from)));
                    }
                    Some(ReadOutputs::Rotations(values)) => {
                        entry.rotations.extend(
                            times
                                .iter()
                                .copied()
                                .zip(values.into_f32().map(Quat::from_array)),
                        );
                    }
                    Some(ReadOutputs::Scales(values)) => {
                        entry
                            .scales
                            .extend(times.iter().copied().zip(values.map(Vec3::from)));
                    }
                    Some(ReadOutputs::MorphTargetWeights(_)) => {
                        tracing::warn!("Clip {name}: morph target weights not supported");
                    }
                    None => {
                        tracing::warn!("Clip {name}: channel has no key values, skipping");
                    }
                }
            }

            RawClip { name, channels }
        })
        .collect()
}

fn load_meshes(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Vec<RawMesh> {
    let mut meshes = Vec::new();

    for mesh in document.meshes() {
        let mesh_name = mesh.name().unwrap_or_default();

        for (index, primitive) in mesh.primitives().enumerate() {
            let reader = primitive
                .reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

            let Some(positions) = reader.read_positions() else {
                tracing::warn!("Mesh {mesh_name}: primitive {index} has no positions, skipping");
                continue;
            };
            let positions: Vec<Vec3> = positions.map(Vec3::from).collect();

            let normals: Vec<Vec3> = reader
                .read_normals()
                .map(|iter| iter.map(Vec3::from).collect())
                .unwrap_or_default();

            let tex_coords: Vec<Vec2> = reader
                .read_tex_coords(0)
                .map(|coords| coords.into_f32().map(Vec2::from).collect())
                .unwrap_or_default();

            let indices: Vec<u32> = reader
                .read_indices()
                .map(|iter| iter.into_u32().collect())
                .unwrap_or_default();

            let influences = match (reader.read_joints(0), reader.read_weights(0)) {
                (Some(joints), Some(weights)) => joints
                    .into_u16()
                    .zip(weights.into_f32())
                    .map(|(joints, weights)| VertexInfluences { joints, weights })
                    .collect(),
                _ => Vec::new(),
            };

            meshes.push(RawMesh {
                name: if mesh.primitives().len() > 1 {
                    format!("{mesh_name}/{index}")
                } else {
                    mesh_name.to_string()
                },
                positions,
                normals,
                tex_coords,
                indices,
                influences,
            });
        }
    }

    meshes
}
