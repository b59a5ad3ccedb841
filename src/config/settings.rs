//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across
//! threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// DetectionConfig
// ---------------------------------------------------------------------------

/// Settings for the detection orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Prompt sent with a bare trigger (one that carries no text of its
    /// own).
    pub default_prompt: String,
    /// Show debug visuals (camera frame + model points) in the overlay.
    pub show_debug_visuals: bool,
    /// Object names whose presence in a detection result is reported.
    pub watchlist: Vec<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            default_prompt: "What do you see? Show me all the objects you can identify.".into(),
            show_debug_visuals: false,
            watchlist: vec![
                "book".into(),
                "poster".into(),
                "pizza".into(),
                "phone".into(),
                "laptop".into(),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// VisionConfig
// ---------------------------------------------------------------------------

/// Settings for the vision-language request client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Base URL of the chat-completions endpoint.
    pub base_url: String,
    /// API key — `None` leaves the detection feature inert.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Maximum seconds to wait for a vision response.
    pub timeout_secs: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai".into(),
            api_key: None,
            model: "llama-3.2-90b-vision-preview".into(),
            temperature: 0.2,
            timeout_secs: 20,
        }
    }
}

// ---------------------------------------------------------------------------
// DepthConfig
// ---------------------------------------------------------------------------

/// Settings for the frame source backing the depth cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Focal length in pixels.
    pub focal_px: f32,
    /// Distance of the synthetic depth plane in meters (used when no
    /// hardware feed is wired).
    pub plane_depth: f32,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            focal_px: 500.0,
            plane_depth: 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for speech synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Base URL of the TTS endpoint.
    pub base_url: String,
    /// API key — `None` for engines that require no authentication.
    pub api_key: Option<String>,
    /// Voice name (e.g. `"Sasha"`, `"Sam"`).
    pub voice_name: String,
    /// Let the engine pick a style automatically.
    pub auto_style: bool,
    /// Fixed style for the Sasha voice (1–6), used when `auto_style` is
    /// off.
    pub style_sasha: u8,
    /// Fixed style for the Sam voice (1–6).
    pub style_sam: u8,
    /// Speaking pace, 0.75 – 1.50.
    pub pace: f32,
    /// Speak `preview_text` once at startup.
    pub preview: bool,
    pub preview_text: String,
    /// Maximum seconds to wait for a synthesis response.
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8880".into(),
            api_key: None,
            voice_name: "Sasha".into(),
            auto_style: true,
            style_sasha: 1,
            style_sam: 1,
            pace: 1.0,
            preview: false,
            preview_text: "Hello, this is a text to speech preview".into(),
            timeout_secs: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// GridConfig
// ---------------------------------------------------------------------------

/// Word-grid layout parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of buttons along the x axis.
    pub width: u32,
    /// Number of button rows.
    pub height: u32,
    /// Spacing between buttons in the x direction.
    pub spacing_x: f32,
    /// Spacing between buttons in the y direction.
    pub spacing_y: f32,
    /// Fixed z plane for all buttons.
    pub z_position: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 6,
            height: 2,
            spacing_x: 1.5,
            spacing_y: 1.5,
            z_position: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use vision_assist::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Detection orchestrator settings.
    pub detection: DetectionConfig,
    /// Vision request client settings.
    pub vision: VisionConfig,
    /// Frame source / depth cache settings.
    pub depth: DepthConfig,
    /// Speech synthesis settings.
    pub speech: SpeechConfig,
    /// Word-grid layout settings.
    pub grid: GridConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist
    /// yet (first-run scenario) so callers never need to special-case a
    /// missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        // DetectionConfig
        assert_eq!(
            original.detection.default_prompt,
            loaded.detection.default_prompt
        );
        assert_eq!(original.detection.watchlist, loaded.detection.watchlist);

        // VisionConfig
        assert_eq!(original.vision.base_url, loaded.vision.base_url);
        assert_eq!(original.vision.api_key, loaded.vision.api_key);
        assert_eq!(original.vision.model, loaded.vision.model);
        assert_eq!(original.vision.timeout_secs, loaded.vision.timeout_secs);

        // DepthConfig
        assert_eq!(original.depth.width, loaded.depth.width);
        assert_eq!(original.depth.focal_px, loaded.depth.focal_px);

        // SpeechConfig
        assert_eq!(original.speech.voice_name, loaded.speech.voice_name);
        assert_eq!(original.speech.pace, loaded.speech.pace);
        assert_eq!(original.speech.style_sasha, loaded.speech.style_sasha);

        // GridConfig
        assert_eq!(original.grid.width, loaded.grid.width);
        assert_eq!(original.grid.spacing_x, loaded.grid.spacing_x);
    }

    /// `load_from` on a non-existent path must return `Default` without
    /// error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(
            config.detection.default_prompt,
            default.detection.default_prompt
        );
        assert_eq!(config.vision.model, default.vision.model);
        assert_eq!(config.grid.width, default.grid.width);
    }

    /// Verify the defaults that the rest of the crate relies on.
    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert!(cfg.detection.default_prompt.starts_with("What do you see?"));
        assert!(!cfg.detection.show_debug_visuals);
        assert_eq!(cfg.detection.watchlist.len(), 5);
        assert!(cfg.vision.api_key.is_none());
        assert_eq!(cfg.depth.width, 640);
        assert_eq!(cfg.depth.height, 480);
        assert_eq!(cfg.speech.voice_name, "Sasha");
        assert!(cfg.speech.auto_style);
        assert_eq!(cfg.speech.pace, 1.0);
        assert_eq!(cfg.grid.width, 6);
        assert_eq!(cfg.grid.height, 2);
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.detection.show_debug_visuals = true;
        cfg.vision.base_url = "http://localhost:11434".into();
        cfg.vision.api_key = Some("gsk-test".into());
        cfg.vision.model = "llava:7b".into();
        cfg.speech.voice_name = "Sam".into();
        cfg.speech.auto_style = false;
        cfg.speech.style_sam = 4;
        cfg.grid.width = 4;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert!(loaded.detection.show_debug_visuals);
        assert_eq!(loaded.vision.base_url, "http://localhost:11434");
        assert_eq!(loaded.vision.api_key, Some("gsk-test".into()));
        assert_eq!(loaded.vision.model, "llava:7b");
        assert_eq!(loaded.speech.voice_name, "Sam");
        assert!(!loaded.speech.auto_style);
        assert_eq!(loaded.speech.style_sam, 4);
        assert_eq!(loaded.grid.width, 4);
    }
}
