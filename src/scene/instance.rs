use glam::Vec3;

use crate::{
    anim::{palette::MatrixPalette, player::Playback, pose::Pose, pose::evaluate_global_pose},
    engine::storage::Handle,
};

use super::{
    model::{Model, Models},
    skinning::{WeightPolicy, skin_positions},
};

/// Per-instance animation state for one placed model: the playback clock and
/// the buffers recomputed every frame. The model itself stays immutable and
/// shared; any number of instances can point at the same handle.
pub struct ModelInstance {
    model: Handle<Model>,
    playback: Playback,
    weight_policy: WeightPolicy,
    pose: Pose,
    palette: MatrixPalette,
    node_positions: Vec<Vec3>,
    /// Skinned positions per mesh, seeded with the rest pose.
    frame_positions: Vec<Vec<Vec3>>,
}

impl ModelInstance {
    pub fn new(handle: Handle<Model>, models: &Models) -> Option<Self> {
        let model = models.get(handle)?;

        Some(Self {
            model: handle,
            playback: Playback::new(model.clips()),
            weight_policy: WeightPolicy::default(),
            pose: Pose::default(),
            palette: MatrixPalette::default(),
            node_positions: Vec::with_capacity(model.hierarchy.len()),
            frame_positions: model
                .meshes
                .iter()
                .map(|mesh| mesh.positions.clone())
                .collect(),
        })
    }

    pub fn model(&self) -> Handle<Model> {
        self.model
    }

    pub fn set_weight_policy(&mut self, policy: WeightPolicy) {
        self.weight_policy = policy;
    }

    /// Advance playback and recompute pose, palette and skinned vertices.
    pub fn update(&mut self, model: &Model, dt: f32) {
        self.playback.advance(dt, model.clips());

        let Some(clip_index) = self.playback.current_clip() else {
            return;
        };
        let clip = &model.clips()[clip_index];

        self.pose = evaluate_global_pose(clip, &model.hierarchy, self.playback.time(), true);
        self.node_positions = self.pose.node_positions();

        let Some(skeleton) = &model.skeleton else {
            return;
        };
        self.palette.build(&self.pose, skeleton);

        for (mesh, frame_positions) in model.meshes.iter().zip(self.frame_positions.iter_mut()) {
            if !mesh.is_skinned() {
                continue;
            }
            skin_positions(
                &self.palette,
                &mesh.positions,
                &mesh.influences,
                self.weight_policy,
                frame_positions,
            );
        }
    }

    pub fn set_animation(&mut self, model: &Model, name: &str) {
        self.playback.set_clip_by_name(name, model.clips());
    }

    pub fn set_animation_index(&mut self, model: &Model, index: usize) {
        self.playback.set_clip_index(index, model.clips());
    }

    /// Jump to `t` seconds past the current clip's start; out-of-range
    /// requests are ignored.
    pub fn set_time(&mut self, model: &Model, t: f32) {
        self.playback.set_time(t, model.clips());
    }

    pub fn current_time(&self, model: &Model) -> f32 {
        self.playback.current_time(model.clips())
    }

    pub fn current_duration(&self, model: &Model) -> f32 {
        self.playback.current_duration(model.clips())
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    /// This frame's global pose.
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// This frame's skinning palette.
    pub fn palette(&self) -> &MatrixPalette {
        &self.palette
    }

    /// Model-space position of every hierarchy node this frame; the joint
    /// point cloud for unskinned playback.
    pub fn node_positions(&self) -> &[Vec3] {
        &self.node_positions
    }

    /// This frame's skinned vertex positions for one mesh, ready for upload.
    /// Unskinned meshes keep their rest positions.
    pub fn frame_positions(&self, mesh: usize) -> &[Vec3] {
        &self.frame_positions[mesh]
    }
}
