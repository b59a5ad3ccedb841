//! Core `VisionClient` trait and the detection response data model.

use async_trait::async_trait;
use thiserror::Error;

use crate::depth::{CameraImage, PixelPos};

// ---------------------------------------------------------------------------
// VisionError
// ---------------------------------------------------------------------------

/// Errors that can occur during a vision request.
///
/// All variants are terminal for their own detection cycle only; the
/// orchestrator resolves them into UI-state transitions and log output.
#[derive(Debug, Error)]
pub enum VisionError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("vision request timed out")]
    Timeout,

    /// The model response could not be parsed into labeled points.
    #[error("failed to parse vision response: {0}")]
    Parse(String),

    /// The model returned a response with no usable content.
    #[error("vision model returned an empty response")]
    EmptyResponse,

    /// No API key is configured; the detection feature is inert.
    #[error("vision client is not configured")]
    NotConfigured,
}

impl From<reqwest::Error> for VisionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            VisionError::Timeout
        } else {
            VisionError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// DetectedPoint / DetectionResponse
// ---------------------------------------------------------------------------

/// One recognized object: a free-text label (not guaranteed unique within
/// a response), its position in the source frame's pixel space, and a
/// rendering hint for downstream label display.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedPoint {
    pub label: String,
    pub pixel: PixelPos,
    pub show_arrow: bool,
}

/// The structured result of one vision request: a free-text message plus
/// an ordered list of detected points.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResponse {
    pub message: String,
    pub points: Vec<DetectedPoint>,
}

// ---------------------------------------------------------------------------
// VisionClient trait
// ---------------------------------------------------------------------------

/// Async interface to the vision-language model.
///
/// Implementations must be `Send + Sync` so they can be shared behind an
/// `Arc<dyn VisionClient>`. Each call resolves exactly once — the
/// returned future yields either a response or an error, never both and
/// never twice.
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Send `image` and `prompt` to the model and await the structured
    /// result.
    async fn request(
        &self,
        image: &CameraImage,
        prompt: &str,
    ) -> Result<DetectionResponse, VisionError>;
}

// Compile-time assertion: Box<dyn VisionClient> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn VisionClient>) {}
};
