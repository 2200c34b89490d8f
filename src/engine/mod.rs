pub mod assets;
pub mod storage;
pub mod transform;

pub mod prelude {
    pub use super::assets::*;
    pub use super::storage::*;
    pub use super::transform::*;
    pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
}
