pub mod hierarchy;
pub mod instance;
pub mod model;
pub mod skeleton;
pub mod skinning;

pub use hierarchy::{Hierarchy, NODE_SENTINEL, Node, NodeIndex};
pub use instance::ModelInstance;
pub use model::{Mesh, Model, Models};
pub use skeleton::{JOINT_SENTINEL, Joint, JointDef, JointIndex, Skeleton};
pub use skinning::{VertexInfluences, WeightPolicy, skin_positions};
