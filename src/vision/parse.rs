//! Parsing of the model's free-text reply into a [`DetectionResponse`].
//!
//! The model is instructed to answer with a single JSON object:
//!
//! ```json
//! {
//!   "message": "I see a book and a phone",
//!   "points": [
//!     { "label": "book",  "x": 0.31, "y": 0.42, "showArrow": true },
//!     { "label": "phone", "x": 0.71, "y": 0.55, "showArrow": false }
//!   ]
//! }
//! ```
//!
//! Coordinates may be normalized (0–1, scaled against the source frame
//! dimensions here) or absolute pixels — models are inconsistent about
//! this, so both are accepted per point. Replies wrapped in Markdown code
//! fences are unwrapped before parsing.

use serde::Deserialize;

use crate::depth::PixelPos;

use super::client::{DetectedPoint, DetectionResponse, VisionError};

// ---------------------------------------------------------------------------
// Wire payload
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct WirePayload {
    #[serde(default, alias = "aiMessage")]
    message: String,
    #[serde(default)]
    points: Vec<WirePoint>,
}

#[derive(Debug, Deserialize)]
struct WirePoint {
    label: String,
    x: f32,
    y: f32,
    #[serde(default, alias = "showArrow")]
    show_arrow: bool,
}

// ---------------------------------------------------------------------------
// parse_detection
// ---------------------------------------------------------------------------

/// Parse model `content` into a [`DetectionResponse`], scaling normalized
/// coordinates against the `width` × `height` of the frame that was sent.
pub fn parse_detection(
    content: &str,
    width: u32,
    height: u32,
) -> Result<DetectionResponse, VisionError> {
    let trimmed = strip_fences(content);
    if trimmed.is_empty() {
        return Err(VisionError::EmptyResponse);
    }

    let payload: WirePayload =
        serde_json::from_str(trimmed).map_err(|e| VisionError::Parse(e.to_string()))?;

    let points = payload
        .points
        .into_iter()
        .map(|p| DetectedPoint {
            label: p.label,
            pixel: to_pixel(p.x, p.y, width, height),
            show_arrow: p.show_arrow,
        })
        .collect();

    Ok(DetectionResponse {
        message: payload.message,
        points,
    })
}

/// A coordinate pair with both components in 0–1 is normalized; anything
/// else is already in pixel space.
fn to_pixel(x: f32, y: f32, width: u32, height: u32) -> PixelPos {
    if (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y) {
        PixelPos::new(x * width as f32, y * height as f32)
    } else {
        PixelPos::new(x, y)
    }
}

/// Unwrap ```json … ``` / ``` … ``` fences the model may add.
fn strip_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
