//! Speech controller — glue between the word grid / response layer and
//! the synthesis engine.
//!
//! Builds [`VoiceOptions`] from config, drives [`SpeechSynthesizer`],
//! and logs the per-word timing list the engine returns. A missing
//! synthesizer is a configuration fault: reported once via logging, and
//! speech output is simply inert for the session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::SpeechConfig;

use super::synthesizer::{SpeechClip, SpeechSynthesizer, VoiceOptions, VoiceStyle};

// ---------------------------------------------------------------------------
// SpeechController
// ---------------------------------------------------------------------------

pub struct SpeechController {
    synth: Option<Arc<dyn SpeechSynthesizer>>,
    config: SpeechConfig,
    missing_reported: AtomicBool,
}

impl SpeechController {
    /// `synth: None` leaves the controller inert (logged on first use).
    pub fn new(synth: Option<Arc<dyn SpeechSynthesizer>>, config: SpeechConfig) -> Self {
        Self {
            synth,
            config,
            missing_reported: AtomicBool::new(false),
        }
    }

    /// Voice options per current config: the per-voice style applies
    /// only when automatic style selection is off.
    pub fn options(&self) -> VoiceOptions {
        let style = if self.config.auto_style {
            VoiceStyle::Auto
        } else if self.config.voice_name == "Sasha" {
            VoiceStyle::fixed(self.config.style_sasha)
        } else {
            VoiceStyle::fixed(self.config.style_sam)
        };

        VoiceOptions::new(self.config.voice_name.clone(), style, self.config.pace)
    }

    /// Synthesize `text` and return the clip for the host to play.
    ///
    /// Returns `None` on any failure — synthesis errors are logged and
    /// never propagate past this boundary.
    pub async fn speak(&self, text: &str) -> Option<SpeechClip> {
        let Some(synth) = &self.synth else {
            if !self.missing_reported.swap(true, Ordering::Relaxed) {
                log::error!("speech: no synthesizer configured — speech output disabled");
            }
            return None;
        };

        log::info!("speech: synthesizing {text:?}");
        match synth.synthesize(text, &self.options()).await {
            Ok(clip) => {
                for timing in &clip.words {
                    log::debug!(
                        "speech: word {:?} start {:.2} end {:.2}",
                        timing.word,
                        timing.start_secs,
                        timing.end_secs
                    );
                }
                Some(clip)
            }
            Err(e) => {
                log::warn!("speech: synthesis failed: {e}");
                None
            }
        }
    }

    /// Speak the configured preview text, if previewing is enabled.
    pub async fn preview(&self) -> Option<SpeechClip> {
        if !self.config.preview || self.config.preview_text.is_empty() {
            return None;
        }
        let text = self.config.preview_text.clone();
        self.speak(&text).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
