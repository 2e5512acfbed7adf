use crate::assets::streamer::LoadProgress;

/// Notifications an item publishes to the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemEvent {
    /// A streaming progress tick.
    Loading(LoadProgress),
    /// The visual is attached and its bounds are up to date.
    Loaded,
    /// Streaming failed; the item stays without a visual.
    Failed(String),
}

/// How the item obtained (or is obtaining) its visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquisitionState {
    /// Nothing to load: no usable asset reference.
    #[default]
    Idle,
    Streaming,
    Streamed,
    Synthesized,
    Failed,
}

impl AcquisitionState {
    /// True once a visual is attached.
    #[must_use]
    pub fn is_loaded(self) -> bool {
        matches!(self, AcquisitionState::Streamed | AcquisitionState::Synthesized)
    }
}
