//! `ApiVisionClient` — calls an OpenAI-compatible `/v1/chat/completions`
//! endpoint with the camera frame attached as an image part.
//!
//! Works with any provider that speaks the chat-completions wire format
//! and accepts image inputs (Groq, Gemini's OpenAI surface, OpenAI,
//! vLLM …). All connection details come from [`VisionConfig`]; nothing is
//! hardcoded.

use std::io::Cursor;

use async_trait::async_trait;
use base64::Engine as _;

use crate::config::VisionConfig;
use crate::depth::CameraImage;

use super::client::{DetectionResponse, VisionClient, VisionError};
use super::parse::parse_detection;

// ---------------------------------------------------------------------------
// System instruction
// ---------------------------------------------------------------------------

/// Pins the model to the JSON contract that [`parse_detection`] expects.
const SYSTEM_INSTRUCTION: &str = "\
You are a visual assistant on a head-worn camera. Identify the objects \
visible in the attached frame and answer with a single JSON object, no \
prose and no Markdown, of the form:
{\"message\": \"<one conversational sentence about what you see>\",
 \"points\": [{\"label\": \"<object name>\", \"x\": <0-1>, \"y\": <0-1>, \"showArrow\": <bool>}]}
Use normalized coordinates for the center of each object. Set showArrow \
true for objects the user is likely to want pointed out.";

// ---------------------------------------------------------------------------
// ApiVisionClient
// ---------------------------------------------------------------------------

/// Production [`VisionClient`] backed by reqwest.
pub struct ApiVisionClient {
    client: reqwest::Client,
    config: VisionConfig,
}

impl ApiVisionClient {
    /// Build an `ApiVisionClient` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout
    /// from `config.timeout_secs`. A default (no-timeout) client is used
    /// as a last-resort fallback if the builder fails (should never
    /// happen in practice).
    pub fn from_config(config: &VisionConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// Encode the RGBA frame as PNG and wrap it in a base64 data URL.
    fn encode_frame(image: &CameraImage) -> Result<String, VisionError> {
        let buffer =
            image::RgbaImage::from_raw(image.width, image.height, image.data.clone())
                .ok_or_else(|| {
                    VisionError::Request("frame buffer does not match its dimensions".into())
                })?;

        let mut png = Cursor::new(Vec::new());
        buffer
            .write_to(&mut png, image::ImageOutputFormat::Png)
            .map_err(|e| VisionError::Request(format!("frame encoding failed: {e}")))?;

        let encoded = base64::engine::general_purpose::STANDARD.encode(png.into_inner());
        Ok(format!("data:image/png;base64,{encoded}"))
    }
}

#[async_trait]
impl VisionClient for ApiVisionClient {
    /// Send the frame and prompt to the configured endpoint.
    ///
    /// The `Authorization: Bearer …` header is attached **only** when
    /// `config.api_key` is `Some(key)` and `key` is non-empty.
    async fn request(
        &self,
        image: &CameraImage,
        prompt: &str,
    ) -> Result<DetectionResponse, VisionError> {
        let data_url = Self::encode_frame(image)?;

        let url = format!("{}/v1/chat/completions", self.config.base_url);

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_INSTRUCTION },
                { "role": "user", "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": data_url } }
                ]}
            ],
            "stream":      false,
            "temperature": self.config.temperature,
            "max_tokens":  512
        });

        let mut req = self.client.post(&url).json(&body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| VisionError::Parse(e.to_string()))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(VisionError::EmptyResponse)?;

        parse_detection(content, image.width, image.height)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(api_key: Option<&str>) -> VisionConfig {
        VisionConfig {
            base_url: "http://localhost:11434".into(),
            api_key: api_key.map(|s| s.to_string()),
            model: "llava:7b".into(),
            temperature: 0.2,
            timeout_secs: 20,
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _client = ApiVisionClient::from_config(&make_config(None));
        let _client = ApiVisionClient::from_config(&make_config(Some("gsk-test")));
    }

    #[test]
    fn encode_frame_produces_png_data_url() {
        let image = CameraImage::solid(8, 8, [200, 10, 10, 255]);
        let url = ApiVisionClient::encode_frame(&image).expect("encode");
        assert!(url.starts_with("data:image/png;base64,"));
        assert!(url.len() > "data:image/png;base64,".len());
    }

    /// Verify that `ApiVisionClient` is usable as `dyn VisionClient`.
    #[test]
    fn client_is_object_safe() {
        let client: Box<dyn VisionClient> =
            Box::new(ApiVisionClient::from_config(&make_config(None)));
        drop(client);
    }
}
