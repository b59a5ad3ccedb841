//! Depth-frame subsystem.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │                DepthCache (trait)                  │
//! │                                                    │
//! │   ┌──────────────┐      ┌────────────┐             │
//! │   │ FrameSource  │─────▶│ FrameStore │             │
//! │   │ (camera+depth│      │ - issue id │             │
//! │   │  feed)       │      │ - resolve  │             │
//! │   └──────────────┘      │ - dispose  │             │
//! │                         └────────────┘             │
//! └────────────────────────────────────────────────────┘
//! ```
//!
//! One `capture()` snapshots image + depth + calibration together;
//! `resolve_world()` back-projects a pixel of that snapshot into world
//! space; `dispose()` releases it. Ids are opaque, strictly increasing,
//! and never reused.

pub mod frame;
pub mod source;
pub mod store;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use frame::{
    CameraImage, CameraIntrinsics, CameraPose, DepthMap, FrameSnapshot, PixelPos, WorldPoint,
};
pub use source::{DepthError, FrameSource, SyntheticFrameSource};
pub use store::{DepthCache, FrameId, FrameStore};
