//! Vision-language request client.
//!
//! This module provides:
//! * [`VisionClient`] — async trait implemented by all vision backends.
//! * [`ApiVisionClient`] — OpenAI-compatible chat-completions client that
//!   ships the camera frame as a base64 PNG data URL.
//! * [`parse_detection`] — turns the model's JSON reply into a
//!   [`DetectionResponse`].
//! * [`VisionError`] — error variants for vision operations.
//!
//! One `request()` call yields exactly one [`DetectionResponse`] or one
//! [`VisionError`]; there is no cancellation and no retry at this layer.

pub mod api;
pub mod client;
pub mod parse;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use api::ApiVisionClient;
pub use client::{DetectedPoint, DetectionResponse, VisionClient, VisionError};
pub use parse::parse_detection;
