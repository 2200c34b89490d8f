//! The ingestion boundary. Importers decode a source file into the
//! normalized [RawDocument] representation; everything downstream of
//! [crate::scene::model::Model] is format-agnostic.

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::scene::{hierarchy::NodeIndex, skinning::VertexInfluences};

pub mod gltf;

#[derive(Debug, Default)]
pub struct RawDocument {
    pub nodes: Vec<RawNode>,
    pub skin: Option<RawSkin>,
    pub clips: Vec<RawClip>,
    pub meshes: Vec<RawMesh>,
}

#[derive(Debug)]
pub struct RawNode {
    pub name: String,
    /// [crate::scene::hierarchy::NODE_SENTINEL] for the root.
    pub parent: NodeIndex,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

#[derive(Debug)]
pub struct RawSkin {
    pub joints: Vec<RawJoint>,
}

#[derive(Debug)]
pub struct RawJoint {
    pub name: String,
    pub node: NodeIndex,
    pub inverse_bind: Mat4,
}

#[derive(Debug, Default)]
pub struct RawClip {
    pub name: String,
    pub channels: Vec<RawChannel>,
}

/// Keyframe data for one target node, already decoded into plain
/// `(time, value)` lists. Unused channels stay empty.
#[derive(Debug)]
pub struct RawChannel {
    pub target: NodeIndex,
    pub translations: Vec<(f32, Vec3)>,
    pub rotations: Vec<(f32, Quat)>,
    pub scales: Vec<(f32, Vec3)>,
}

impl RawChannel {
    pub fn new(target: NodeIndex) -> Self {
        Self {
            target,
            translations: Vec::new(),
            rotations: Vec::new(),
            scales: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct RawMesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub indices: Vec<u32>,
    /// One entry per vertex for skinned meshes, empty otherwise.
    pub influences: Vec<VertexInfluences>,
}
