//! Pipeline state machine and per-instance shared state.
//!
//! [`PipelineState`] drives the busy indicator and control enabling. The
//! owning form reads it, together with the resolved URL and storage
//! reference, through [`SharedAssetState`].
//!
//! [`SharedAssetState`] is a type alias for `Arc<Mutex<AssetState>>`. Each
//! pipeline instance owns exactly one; audio and image never share state.

use std::sync::{Arc, Mutex, MutexGuard};

use super::error::PipelineError;
use crate::storage::StorageReference;

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// States of one asset pipeline.
///
/// ```text
/// Idle ──generate/upload──▶ Busy ──success──▶ Ready
///                                ──error────▶ Failed
/// Ready / Failed ──generate/upload──▶ Busy
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// Nothing has been requested yet.
    #[default]
    Idle,

    /// A generation or upload is in flight.
    Busy,

    /// The asset is uploaded and its URL resolved.
    Ready,

    /// The last cycle failed; a new request may be issued at any time.
    Failed,
}

impl PipelineState {
    /// Returns `true` while a remote step is in flight.
    ///
    /// The UI uses this to disable the generate / upload controls.
    ///
    /// ```
    /// use podcast_assets::pipeline::PipelineState;
    ///
    /// assert!(!PipelineState::Idle.is_busy());
    /// assert!(PipelineState::Busy.is_busy());
    /// assert!(!PipelineState::Ready.is_busy());
    /// assert!(!PipelineState::Failed.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, PipelineState::Busy)
    }

    /// A short human-readable label suitable for a button or status line.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Generate",
            PipelineState::Busy => "Generating",
            PipelineState::Ready => "Done",
            PipelineState::Failed => "Error",
        }
    }
}

// ---------------------------------------------------------------------------
// AssetState
// ---------------------------------------------------------------------------

/// Everything the owning form reads from one pipeline instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetState {
    /// Current phase.
    pub pipeline: PipelineState,

    /// Playable / displayable URL. `Some` only in `Ready`.
    pub resolved_url: Option<String>,

    /// Storage handle persisted with the podcast on form submission.
    pub storage: Option<StorageReference>,

    /// Why the last cycle failed, when `pipeline == Failed`.
    pub error: Option<PipelineError>,

    /// Clip length reported by the playback element (audio only).
    pub duration_secs: Option<f64>,
}

impl AssetState {
    /// Drop everything left from the previous cycle and enter `Busy`.
    pub(crate) fn begin(&mut self) {
        *self = AssetState {
            pipeline: PipelineState::Busy,
            ..AssetState::default()
        };
    }
}

// ---------------------------------------------------------------------------
// SharedAssetState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`AssetState`].
///
/// Cheap to clone (`Arc` clone). Lock for a short critical section only and
/// never hold the guard across an `.await` point.
pub type SharedAssetState = Arc<Mutex<AssetState>>;

/// Construct a new [`SharedAssetState`] in `Idle`.
pub fn new_shared_state() -> SharedAssetState {
    Arc::new(Mutex::new(AssetState::default()))
}

/// Lock `state`, recovering the data if a previous holder panicked.
pub(crate) fn lock(state: &SharedAssetState) -> MutexGuard<'_, AssetState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_busy_is_busy() {
        assert!(!PipelineState::Idle.is_busy());
        assert!(PipelineState::Busy.is_busy());
        assert!(!PipelineState::Ready.is_busy());
        assert!(!PipelineState::Failed.is_busy());
    }

    #[test]
    fn labels() {
        assert_eq!(PipelineState::Idle.label(), "Generate");
        assert_eq!(PipelineState::Busy.label(), "Generating");
        assert_eq!(PipelineState::Ready.label(), "Done");
        assert_eq!(PipelineState::Failed.label(), "Error");
    }

    #[test]
    fn default_state_is_idle_and_empty() {
        let state = AssetState::default();
        assert_eq!(state.pipeline, PipelineState::Idle);
        assert!(state.resolved_url.is_none());
        assert!(state.storage.is_none());
        assert!(state.error.is_none());
        assert!(state.duration_secs.is_none());
    }

    #[test]
    fn begin_clears_previous_cycle() {
        let mut state = AssetState {
            pipeline: PipelineState::Ready,
            resolved_url: Some("https://files.test/a".into()),
            storage: Some(StorageReference::new("a")),
            error: None,
            duration_secs: Some(12.5),
        };
        state.begin();

        assert_eq!(state.pipeline, PipelineState::Busy);
        assert!(state.resolved_url.is_none());
        assert!(state.storage.is_none());
        assert!(state.duration_secs.is_none());
    }

    #[test]
    fn shared_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedAssetState>();
    }

    #[test]
    fn shared_state_can_be_cloned_and_mutated() {
        let state = new_shared_state();
        let state2 = Arc::clone(&state);

        lock(&state).pipeline = PipelineState::Busy;
        assert_eq!(lock(&state2).pipeline, PipelineState::Busy);
    }
}
