use super::clip::Clip;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing { clip: usize },
}

/// The per-instance playback clock: which clip is active, where in it we
/// are, and how fast it advances. Playback loops indefinitely; there is no
/// automatic transition back to `Stopped`.
#[derive(Clone, Debug)]
pub struct Playback {
    state: PlaybackState,
    /// Absolute clip time, within `[start_time, end_time]` of the active clip.
    time: f32,
    play_rate: f32,
}

impl Playback {
    /// Starts playing the first clip if there is one.
    pub fn new(clips: &[Clip]) -> Self {
        let state = if clips.is_empty() {
            PlaybackState::Stopped
        } else {
            PlaybackState::Playing { clip: 0 }
        };

        Self {
            state,
            time: clips.first().map_or(0.0, Clip::start_time),
            play_rate: 1.0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_clip(&self) -> Option<usize> {
        match self.state {
            PlaybackState::Playing { clip } => Some(clip),
            PlaybackState::Stopped => None,
        }
    }

    /// Absolute time within the active clip's `[start, end]` range.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Seconds since the active clip's start.
    pub fn current_time(&self, clips: &[Clip]) -> f32 {
        match self.current_clip() {
            Some(clip) => self.time - clips[clip].start_time(),
            None => 0.0,
        }
    }

    pub fn current_duration(&self, clips: &[Clip]) -> f32 {
        self.current_clip().map_or(0.0, |clip| clips[clip].duration())
    }

    pub fn play_rate(&self) -> f32 {
        self.play_rate
    }

    pub fn set_play_rate(&mut self, play_rate: f32) {
        self.play_rate = play_rate;
    }

    /// Advance time by `dt * play_rate` and wrap back into the clip's range.
    /// A single large step wraps as many times as needed.
    pub fn advance(&mut self, dt: f32, clips: &[Clip]) {
        let Some(index) = self.current_clip() else {
            return;
        };
        let clip = &clips[index];

        self.time += dt * self.play_rate;

        let duration = clip.duration();
        if duration > 0.0 && self.time > clip.end_time() {
            self.time = clip.start_time() + (self.time - clip.start_time()).rem_euclid(duration);
        } else if duration <= 0.0 {
            self.time = clip.start_time();
        }
    }

    /// Switch to the clip at `index` and rewind to its start.
    pub fn set_clip_index(&mut self, index: usize, clips: &[Clip]) {
        let Some(clip) = clips.get(index) else {
            tracing::warn!("Trying to play missing clip index: {index}");
            return;
        };

        self.state = PlaybackState::Playing { clip: index };
        self.time = clip.start_time();
    }

    /// Switch to the named clip and rewind to its start. An unknown name
    /// leaves the current state untouched.
    pub fn set_clip_by_name(&mut self, name: &str, clips: &[Clip]) {
        match clips.iter().position(|clip| clip.name() == name) {
            Some(index) => self.set_clip_index(index, clips),
            None => tracing::warn!("Trying to play missing clip: {name}"),
        }
    }

    /// Jump to `t` seconds past the clip start. Values outside
    /// `[0, duration)` are ignored and leave the time unchanged.
    pub fn set_time(&mut self, t: f32, clips: &[Clip]) {
        let Some(index) = self.current_clip() else {
            return;
        };
        let clip = &clips[index];

        if t >= 0.0 && t < clip.duration() {
            self.time = clip.start_time() + t;
        }
    }
}
