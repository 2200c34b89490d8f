pub mod clip;
pub mod interpolate;
pub mod palette;
pub mod player;
pub mod pose;
pub mod track;

pub use clip::{ChannelSet, Clip};
pub use interpolate::Interpolate;
pub use palette::{MAX_BONES, MatrixPalette};
pub use player::{Playback, PlaybackState};
pub use pose::{Pose, evaluate_global_pose, evaluate_local_pose};
pub use track::Track;
