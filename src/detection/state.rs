//! Detector state machine and shared UI state.
//!
//! [`DetectorState`] is the orchestrator's two-state machine. The host
//! renderer reads [`SharedUiState`] to draw the trigger affordance,
//! loading indicator, response bubble, and world-anchored labels — this
//! crate never renders anything itself.
//!
//! [`SharedUiState`] is a type alias for `Arc<Mutex<UiState>>` — cheap to
//! clone and safe to share across threads.

use std::sync::{Arc, Mutex};

use crate::depth::WorldPoint;

// ---------------------------------------------------------------------------
// DetectorState
// ---------------------------------------------------------------------------

/// States of the detection cycle.
///
/// ```text
/// Idle ──trigger──▶ InFlight
/// InFlight ──vision succeeded / vision failed──▶ Idle
/// InFlight ──trigger──▶ InFlight   (dropped, no transition)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectorState {
    /// Waiting for a detection trigger.
    #[default]
    Idle,

    /// A frame has been captured and a vision request is outstanding.
    InFlight,
}

impl DetectorState {
    /// `true` while a detection cycle is running. The UI uses this to
    /// disable the trigger affordance.
    pub fn is_busy(&self) -> bool {
        matches!(self, DetectorState::InFlight)
    }
}

// ---------------------------------------------------------------------------
// WorldLabel
// ---------------------------------------------------------------------------

/// A world-anchored label ready for the host to render.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldLabel {
    pub text: String,
    pub position: WorldPoint,
    pub show_arrow: bool,
}

// ---------------------------------------------------------------------------
// UiState
// ---------------------------------------------------------------------------

/// Prompt shown while the detector is idle.
pub const PROMPT_IDLE: &str = "Tap to detect objects";
/// Prompt shown while a detection cycle is in flight.
pub const PROMPT_BUSY: &str = "Detecting objects...";

/// Everything the host renderer needs: current detector phase, trigger
/// affordance, loading indicator, prompt text, the response bubble, and
/// the live world labels.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Current phase of the detection cycle.
    pub detector: DetectorState,

    /// Whether the trigger affordance accepts input.
    pub trigger_enabled: bool,

    /// Whether the loading indicator is visible.
    pub loading: bool,

    /// Prompt text next to the trigger affordance.
    pub prompt_text: String,

    /// The response bubble's message. `None` while the bubble is closed.
    pub response_message: Option<String>,

    /// World-anchored labels from the most recent completed cycle.
    pub world_labels: Vec<WorldLabel>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            detector: DetectorState::Idle,
            trigger_enabled: true,
            loading: false,
            prompt_text: PROMPT_IDLE.into(),
            response_message: None,
            world_labels: Vec::new(),
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// SharedUiState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`UiState`].
///
/// Lock with `.lock().unwrap()` for a short critical section; do **not**
/// hold the lock across `.await` points.
pub type SharedUiState = Arc<Mutex<UiState>>;

/// Construct a new [`SharedUiState`] wrapping a default [`UiState`].
pub fn new_shared_ui_state() -> SharedUiState {
    Arc::new(Mutex::new(UiState::new()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
