//! Depth-frame cache: bounded-lifetime snapshot storage addressed by
//! opaque frame ids.
//!
//! [`FrameStore`] is the production [`DepthCache`]. One `capture()` call
//! snapshots the frame source, stores the depth map + calibration under a
//! fresh [`FrameId`], and hands back the id together with the camera
//! image from the *same* snapshot. Later `resolve_world()` calls look the
//! pixel up against that stored snapshot, and `dispose()` releases it.
//!
//! Ids are strictly increasing and never reused, so a stale id from a
//! disposed frame can never alias a live one.

use std::collections::HashMap;
use std::sync::Mutex;

use super::frame::{CameraImage, CameraIntrinsics, CameraPose, DepthMap, PixelPos, WorldPoint};
use super::source::{DepthError, FrameSource};

// ---------------------------------------------------------------------------
// FrameId
// ---------------------------------------------------------------------------

/// Opaque handle identifying one captured depth+camera snapshot.
///
/// Valid from `capture()` until `dispose()`; resolution against a
/// disposed id returns `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

impl FrameId {
    /// Wrap a raw id. Intended for [`DepthCache`] implementations other
    /// than [`FrameStore`] (device bindings, test doubles); orchestration
    /// code treats ids as opaque.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for FrameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// DepthCache trait
// ---------------------------------------------------------------------------

/// The interface the detection orchestrator consumes.
///
/// Object-safe and `Send + Sync` so it can be held behind an
/// `Arc<dyn DepthCache>` and called from the orchestrator task.
pub trait DepthCache: Send + Sync {
    /// Snapshot the current frame. Returns the issued id and the camera
    /// image from the same capture.
    fn capture(&self) -> Result<(FrameId, CameraImage), DepthError>;

    /// Resolve a pixel of frame `id` to a world position. `None` means
    /// there is no usable depth sample at that pixel, or the frame has
    /// already been disposed.
    fn resolve_world(&self, id: FrameId, pixel: PixelPos) -> Option<WorldPoint>;

    /// Release the snapshot stored under `id`. Disposing an unknown id
    /// is a logged no-op.
    fn dispose(&self, id: FrameId);
}

// ---------------------------------------------------------------------------
// FrameStore
// ---------------------------------------------------------------------------

/// What `FrameStore` keeps per live frame. The camera image is handed
/// out at capture time and not retained here.
struct StoredFrame {
    depth: DepthMap,
    intrinsics: CameraIntrinsics,
    pose: CameraPose,
}

struct StoreInner {
    frames: HashMap<u64, StoredFrame>,
    next_id: u64,
}

/// In-process [`DepthCache`] over an injected [`FrameSource`].
pub struct FrameStore {
    source: Box<dyn FrameSource>,
    inner: Mutex<StoreInner>,
}

impl FrameStore {
    pub fn new(source: Box<dyn FrameSource>) -> Self {
        Self {
            source,
            inner: Mutex::new(StoreInner {
                frames: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of snapshots currently held.
    pub fn live_frames(&self) -> usize {
        self.inner.lock().unwrap().frames.len()
    }
}

impl DepthCache for FrameStore {
    fn capture(&self) -> Result<(FrameId, CameraImage), DepthError> {
        let snapshot = self.source.capture()?;

        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.frames.insert(
            id,
            StoredFrame {
                depth: snapshot.depth,
                intrinsics: snapshot.intrinsics,
                pose: snapshot.pose,
            },
        );

        log::debug!("depth: captured {} ({} live)", FrameId(id), inner.frames.len());
        Ok((FrameId(id), snapshot.image))
    }

    fn resolve_world(&self, id: FrameId, pixel: PixelPos) -> Option<WorldPoint> {
        let inner = self.inner.lock().unwrap();
        let frame = inner.frames.get(&id.0)?;
        let depth = frame.depth.sample(pixel)?;
        Some(frame.pose.to_world(frame.intrinsics.back_project(pixel, depth)))
    }

    fn dispose(&self, id: FrameId) {
        let mut inner = self.inner.lock().unwrap();
        if inner.frames.remove(&id.0).is_none() {
            log::warn!("depth: dispose of unknown {}", id);
        } else {
            log::debug!("depth: disposed {}", id);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
