use ahash::HashMap;
use glam::{Quat, Vec3};

use crate::scene::hierarchy::NodeIndex;

use super::track::Track;

/// The animated channels of a single node. Any track may be empty, meaning
/// that component keeps the node's rest value.
#[derive(Clone, Debug, Default)]
pub struct ChannelSet {
    pub translations: Track<Vec3>,
    pub rotations: Track<Quat>,
    pub scales: Track<Vec3>,
}

impl ChannelSet {
    /// Earliest and latest key time over all three tracks.
    pub fn time_bounds(&self) -> Option<(f32, f32)> {
        [
            self.translations.time_bounds(),
            self.rotations.time_bounds(),
            self.scales.time_bounds(),
        ]
        .into_iter()
        .flatten()
        .reduce(|(start, end), (s, e)| (start.min(s), end.max(e)))
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty() && self.rotations.is_empty() && self.scales.is_empty()
    }
}

/// A named animation: per-node channel tracks plus the time range covered by
/// their keys. Immutable once built.
#[derive(Clone, Debug)]
pub struct Clip {
    name: String,
    channels: HashMap<NodeIndex, ChannelSet>,
    start_time: f32,
    end_time: f32,
}

impl Clip {
    pub fn new(name: impl Into<String>, channels: HashMap<NodeIndex, ChannelSet>) -> Self {
        let (start_time, end_time) = channels
            .values()
            .filter_map(ChannelSet::time_bounds)
            .reduce(|(start, end), (s, e)| (start.min(s), end.max(e)))
            .unwrap_or((0.0, 0.0));

        Self {
            name: name.into(),
            channels,
            start_time,
            end_time,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channels_for(&self, node: NodeIndex) -> Option<&ChannelSet> {
        self.channels.get(&node)
    }

    pub fn start_time(&self) -> f32 {
        self.start_time
    }

    pub fn end_time(&self) -> f32 {
        self.end_time
    }

    pub fn duration(&self) -> f32 {
        self.end_time - self.start_time
    }
}
