use glam::{Vec3, Vec4};

use crate::anim::palette::MatrixPalette;

/// Up to four joint influences per vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexInfluences {
    pub joints: [u16; 4],
    pub weights: [f32; 4],
}

/// How vertex weights are treated before blending.
///
/// Content is normally authored with weights summing to one, and the source
/// pipeline used them verbatim. Renormalizing is opt-in so unnormalized
/// input fails visibly instead of being silently patched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WeightPolicy {
    #[default]
    AsAuthored,
    Normalized,
}

/// Linear-blend skin rest positions through the palette into `out`.
///
/// `out` is a frame-local buffer distinct from the rest positions; normals
/// are not re-skinned.
pub fn skin_positions(
    palette: &MatrixPalette,
    rest: &[Vec3],
    influences: &[VertexInfluences],
    policy: WeightPolicy,
    out: &mut Vec<Vec3>,
) {
    debug_assert_eq!(rest.len(), influences.len());

    out.clear();
    out.reserve(rest.len());

    for (position, vertex) in rest.iter().zip(influences) {
        let mut weights = vertex.weights;
        if policy == WeightPolicy::Normalized {
            let sum: f32 = weights.iter().sum();
            if sum > 0.0 {
                for weight in weights.iter_mut() {
                    *weight /= sum;
                }
            }
        }

        let rest = Vec4::new(position.x, position.y, position.z, 1.0);
        let mut skinned = Vec4::ZERO;
        for (joint, weight) in vertex.joints.iter().zip(weights) {
            if weight == 0.0 {
                continue;
            }
            skinned += (palette.matrix(*joint as usize) * rest) * weight;
        }

        out.push(skinned.truncate());
    }
}
