//! `ApiSpeechSynthesizer` — HTTP text-to-speech client.
//!
//! Posts a JSON request to the configured endpoint and expects base64
//! audio plus a word-timing list back. All connection details come from
//! [`SpeechConfig`].

use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;

use crate::config::SpeechConfig;

use super::synthesizer::{
    SpeechClip, SpeechError, SpeechSynthesizer, VoiceOptions, VoiceStyle, WordTiming,
};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct WireResponse {
    /// Base64-encoded audio payload. Absent on engine errors.
    #[serde(default)]
    audio: String,
    #[serde(default)]
    words: Vec<WireWord>,
    /// Engine-side error message, set instead of `audio` on failure.
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireWord {
    word: String,
    #[serde(alias = "startTime")]
    start: f32,
    #[serde(alias = "endTime")]
    end: f32,
}

// ---------------------------------------------------------------------------
// ApiSpeechSynthesizer
// ---------------------------------------------------------------------------

/// Production [`SpeechSynthesizer`] backed by reqwest.
pub struct ApiSpeechSynthesizer {
    client: reqwest::Client,
    config: SpeechConfig,
}

impl ApiSpeechSynthesizer {
    /// Build a synthesizer from application config. The HTTP client is
    /// pre-configured with the per-request timeout.
    pub fn from_config(config: &SpeechConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for ApiSpeechSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        options: &VoiceOptions,
    ) -> Result<SpeechClip, SpeechError> {
        let url = format!("{}/v1/tts", self.config.base_url);

        let style = match options.style {
            VoiceStyle::Auto => serde_json::json!("Auto"),
            VoiceStyle::Fixed(n) => serde_json::json!(n),
        };

        let body = serde_json::json!({
            "text":  text,
            "voice": options.voice_name,
            "style": style,
            "pace":  options.wire_pace(),
        });

        let mut req = self.client.post(&url).json(&body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::Parse(e.to_string()))?;

        if let Some(error) = wire.error {
            return Err(SpeechError::Synthesis(error));
        }

        let audio = base64::engine::general_purpose::STANDARD
            .decode(&wire.audio)
            .map_err(|e| SpeechError::Parse(format!("bad audio payload: {e}")))?;

        let words = wire
            .words
            .into_iter()
            .map(|w| WordTiming {
                word: w.word,
                start_secs: w.start,
                end_secs: w.end,
            })
            .collect();

        Ok(SpeechClip { audio, words })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_builds_without_panic() {
        let _synth = ApiSpeechSynthesizer::from_config(&SpeechConfig::default());
    }

    #[test]
    fn synthesizer_is_object_safe() {
        let synth: Box<dyn SpeechSynthesizer> =
            Box::new(ApiSpeechSynthesizer::from_config(&SpeechConfig::default()));
        drop(synth);
    }

    #[test]
    fn wire_response_accepts_timing_aliases() {
        let json = r#"{"audio":"AAAA","words":[{"word":"hi","startTime":0.0,"endTime":0.4}]}"#;
        let wire: WireResponse = serde_json::from_str(json).expect("parse");
        assert_eq!(wire.words.len(), 1);
        assert_eq!(wire.words[0].word, "hi");
        assert!((wire.words[0].end - 0.4).abs() < f32::EPSILON);
    }
}
