//! Consumer capabilities the orchestrator fans out to.
//!
//! Each consumer renders (or reacts) independently; they never talk to
//! each other except through the orchestrator. All of them are wired
//! explicitly at construction — nothing is discovered at runtime.

use crate::depth::{CameraImage, PixelPos, WorldPoint};

use super::state::{SharedUiState, WorldLabel};

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Receives the response's free-text message (the "response bubble").
pub trait ResponseSink: Send + Sync {
    /// Open the bubble with `message`.
    fn open_message(&self, message: &str);
    /// Close the bubble, discarding any displayed message.
    fn clear(&self);
}

/// Receives world-anchored labels for rendering in physical space.
pub trait WorldLabelSink: Send + Sync {
    fn spawn_label(&self, label: &str, position: WorldPoint, show_arrow: bool);
    fn clear_labels(&self);
}

/// Debug overlay for visualizing the captured frame and the model's 2D
/// points. Optional — the orchestrator only calls it when debug visuals
/// are enabled.
pub trait PointOverlay: Send + Sync {
    fn show_camera_frame(&self, image: &CameraImage);
    fn mark_point(&self, pixel: PixelPos);
}

/// Receives the flat ordered label list, once per successfully completed
/// cycle. Duplicates are preserved; deduplication is the listener's
/// concern.
pub trait LabelListener: Send + Sync {
    fn on_labels_detected(&self, labels: &[String]);
}

// ---------------------------------------------------------------------------
// UiState-backed implementations
// ---------------------------------------------------------------------------

/// [`ResponseSink`] that writes the bubble message into shared UI state.
pub struct UiResponseSink {
    ui: SharedUiState,
}

impl UiResponseSink {
    pub fn new(ui: SharedUiState) -> Self {
        Self { ui }
    }
}

impl ResponseSink for UiResponseSink {
    fn open_message(&self, message: &str) {
        self.ui.lock().unwrap().response_message = Some(message.to_string());
    }

    fn clear(&self) {
        self.ui.lock().unwrap().response_message = None;
    }
}

/// [`WorldLabelSink`] that collects world labels into shared UI state.
pub struct UiWorldLabelSink {
    ui: SharedUiState,
}

impl UiWorldLabelSink {
    pub fn new(ui: SharedUiState) -> Self {
        Self { ui }
    }
}

impl WorldLabelSink for UiWorldLabelSink {
    fn spawn_label(&self, label: &str, position: WorldPoint, show_arrow: bool) {
        self.ui.lock().unwrap().world_labels.push(WorldLabel {
            text: label.to_string(),
            position,
            show_arrow,
        });
    }

    fn clear_labels(&self) {
        self.ui.lock().unwrap().world_labels.clear();
    }
}

/// [`PointOverlay`] that only logs — stands in for an in-scene overlay
/// when running outside the AR engine.
pub struct LogOverlay;

impl PointOverlay for LogOverlay {
    fn show_camera_frame(&self, image: &CameraImage) {
        log::debug!("overlay: camera frame {}x{}", image.width, image.height);
    }

    fn mark_point(&self, pixel: PixelPos) {
        log::debug!("overlay: point at ({:.1}, {:.1})", pixel.x, pixel.y);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
