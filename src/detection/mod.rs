//! Detection orchestration — the core of the crate.
//!
//! # Architecture
//!
//! ```text
//! DetectorEvent (mpsc)
//!        │
//!        ▼
//! DetectionOrchestrator::run()  ← async tokio task
//!        │
//!        ├─ Trigger           → drop if in flight, else busy UI,
//!        │                      capture frame, spawn vision request
//!        │
//!        └─ VisionCompleted
//!              │
//!              ├─ idle UI
//!              ├─ Ok  → ResponseSink, per-point resolve → WorldLabelSink,
//!              │        dispose frame, LabelListener fan-out
//!              └─ Err → dispose frame
//!
//! SharedUiState (Arc<Mutex<UiState>>) ←─── read by the host renderer
//! ```
//!
//! At most one cycle is in flight at any time; a trigger arriving
//! mid-cycle is dropped, not queued. Each accepted cycle disposes its
//! captured frame id exactly once.

pub mod consumers;
pub mod orchestrator;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use consumers::{
    LabelListener, LogOverlay, PointOverlay, ResponseSink, UiResponseSink, UiWorldLabelSink,
    WorldLabelSink,
};
pub use orchestrator::{DetectionOrchestrator, DetectorEvent};
pub use state::{
    new_shared_ui_state, DetectorState, SharedUiState, UiState, WorldLabel, PROMPT_BUSY,
    PROMPT_IDLE,
};
