//! Core `SpeechSynthesizer` trait, voice options, and result types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

/// Errors that can occur during speech synthesis.
///
/// A synthesis failure never affects any other subsystem — callers log
/// it and move on without audio.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("synthesis request timed out")]
    Timeout,

    /// The response could not be parsed into audio + word timings.
    #[error("failed to parse synthesis response: {0}")]
    Parse(String),

    /// The engine reported a synthesis error.
    #[error("synthesis failed: {0}")]
    Synthesis(String),
}

impl From<reqwest::Error> for SpeechError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SpeechError::Timeout
        } else {
            SpeechError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// VoiceOptions
// ---------------------------------------------------------------------------

/// User-facing pace bounds.
pub const MIN_PACE: f32 = 0.75;
pub const MAX_PACE: f32 = 1.50;

/// Scale factor applied to the pace before transmission: the engine
/// expects `75–150`, the config speaks `0.75–1.50`.
const VOICE_PACE_SCALE: f32 = 100.0;

/// Voice style: automatic selection or a fixed style index 1–6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceStyle {
    Auto,
    Fixed(u8),
}

impl VoiceStyle {
    /// A fixed style, clamped into the valid 1–6 range.
    pub fn fixed(style: u8) -> Self {
        VoiceStyle::Fixed(style.clamp(1, 6))
    }
}

/// Voice configuration for one synthesis call.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceOptions {
    pub voice_name: String,
    pub style: VoiceStyle,
    pace: f32,
}

impl VoiceOptions {
    /// `pace` is clamped into the user-facing `0.75–1.50` range.
    pub fn new(voice_name: impl Into<String>, style: VoiceStyle, pace: f32) -> Self {
        Self {
            voice_name: voice_name.into(),
            style,
            pace: pace.clamp(MIN_PACE, MAX_PACE),
        }
    }

    /// The user-facing pace value.
    pub fn pace(&self) -> f32 {
        self.pace
    }

    /// The pace as transmitted to the engine.
    pub fn wire_pace(&self) -> f32 {
        self.pace * VOICE_PACE_SCALE
    }
}

// ---------------------------------------------------------------------------
// WordTiming / SpeechClip
// ---------------------------------------------------------------------------

/// When one word of the synthesized utterance is spoken, in seconds from
/// the start of the clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    pub word: String,
    pub start_secs: f32,
    pub end_secs: f32,
}

/// A synthesized utterance: the audio handle plus per-word timings. The
/// host engine owns playback.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechClip {
    pub audio: Vec<u8>,
    pub words: Vec<WordTiming>,
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Async interface to the text-to-speech engine.
///
/// Implementations must be `Send + Sync` so they can be shared behind an
/// `Arc<dyn SpeechSynthesizer>`. Each call resolves exactly once.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        text: &str,
        options: &VoiceOptions,
    ) -> Result<SpeechClip, SpeechError>;
}

// Compile-time assertion: Box<dyn SpeechSynthesizer> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechSynthesizer>) {}
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
