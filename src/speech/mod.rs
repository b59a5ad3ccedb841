//! Speech synthesis service.
//!
//! This module provides:
//! * [`SpeechSynthesizer`] — async trait implemented by all TTS backends.
//! * [`ApiSpeechSynthesizer`] — HTTP backend (base64 audio + word timings).
//! * [`SpeechController`] — option construction, timing logging, inert
//!   degradation when no synthesizer is wired.
//! * [`VoiceOptions`] / [`VoiceStyle`] / [`WordTiming`] / [`SpeechClip`].
//!
//! Playback is owned by the host engine; this crate only produces clips.

pub mod api;
pub mod controller;
pub mod synthesizer;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use api::ApiSpeechSynthesizer;
pub use controller::SpeechController;
pub use synthesizer::{
    SpeechClip, SpeechError, SpeechSynthesizer, VoiceOptions, VoiceStyle, WordTiming, MAX_PACE,
    MIN_PACE,
};
