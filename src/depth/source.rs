//! Frame sources — where snapshots come from.
//!
//! The AR engine's camera+depth feed sits behind [`FrameSource`] so the
//! depth store never talks to device APIs directly. The crate ships
//! [`SyntheticFrameSource`] (a flat plane at a fixed distance) for the
//! demo binary and for tests; a deployment against real hardware wires
//! its own implementation.

use thiserror::Error;

use super::frame::{CameraImage, CameraIntrinsics, CameraPose, DepthMap, FrameSnapshot};

// ---------------------------------------------------------------------------
// DepthError
// ---------------------------------------------------------------------------

/// Errors from the depth subsystem.
#[derive(Debug, Clone, Error)]
pub enum DepthError {
    /// The underlying frame source could not produce a snapshot.
    #[error("frame capture failed: {0}")]
    Capture(String),
}

// ---------------------------------------------------------------------------
// FrameSource trait
// ---------------------------------------------------------------------------

/// Produces depth+camera snapshots on demand.
///
/// Implementations must be `Send + Sync` so they can be shared behind an
/// `Arc<dyn FrameSource>`.
pub trait FrameSource: Send + Sync {
    /// Capture one snapshot of the current view. Image and depth must
    /// come from the same instant.
    fn capture(&self) -> Result<FrameSnapshot, DepthError>;
}

// ---------------------------------------------------------------------------
// SyntheticFrameSource
// ---------------------------------------------------------------------------

/// A stand-in frame source: a mid-gray image over a flat depth plane at
/// a configurable distance, with centered pinhole intrinsics and an
/// identity pose.
pub struct SyntheticFrameSource {
    width: u32,
    height: u32,
    focal_px: f32,
    plane_depth: f32,
}

impl SyntheticFrameSource {
    /// # Arguments
    ///
    /// * `width`, `height` — frame dimensions in pixels.
    /// * `focal_px`        — focal length in pixels.
    /// * `plane_depth`     — distance of the flat plane in meters.
    pub fn new(width: u32, height: u32, focal_px: f32, plane_depth: f32) -> Self {
        Self {
            width,
            height,
            focal_px,
            plane_depth,
        }
    }
}

impl FrameSource for SyntheticFrameSource {
    fn capture(&self) -> Result<FrameSnapshot, DepthError> {
        Ok(FrameSnapshot {
            image: CameraImage::solid(self.width, self.height, [128, 128, 128, 255]),
            depth: DepthMap::uniform(self.width, self.height, self.plane_depth),
            intrinsics: CameraIntrinsics::centered(self.width, self.height, self.focal_px),
            pose: CameraPose::identity(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
