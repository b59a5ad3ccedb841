//! Word-button grid — the spoken-phrase UI refreshed from detections.
//!
//! The grid always carries twelve static buttons (ids 1–12); each
//! detection cycle appends the freshly detected entries after a second
//! dedup pass against both the static words and the detected set itself.
//! Static entries win on conflict, so the combined display never shows
//! two buttons for the same word.
//!
//! Layout is plain row-major math over a configurable `width × height`
//! cell grid centered on the grid origin; the host engine instantiates
//! the actual button objects at the returned positions.

use serde::{Deserialize, Serialize};

use crate::config::GridConfig;
use crate::labels::DetectedObjectData;

// ---------------------------------------------------------------------------
// WordButton
// ---------------------------------------------------------------------------

/// One button: a display word and the phrase spoken when it is tapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordButton {
    pub id: u64,
    pub word: String,
    pub prompt: String,
}

/// The static baseline button set. Ids 1–12 are owned by these entries;
/// dynamically detected entries are numbered from 13 upward by the label
/// fan-out.
const DEFAULT_BUTTONS: &[(&str, &str)] = &[
    ("Yes", "Yes, I agree with that"),
    ("No", "I don't agree"),
    ("Help", "I need help please"),
    ("Stop", "Please stop what you're doing"),
    ("More", "I would like more please"),
    ("Eat", "I'm hungry and want to eat"),
    ("Drink", "I'm thirsty and need a drink"),
    ("Bathroom", "I need to use the bathroom"),
    ("Tired", "I'm feeling tired and need to rest"),
    ("Pain", "I'm experiencing pain and discomfort"),
    ("OK", "I'm okay and feeling fine"),
    ("Break", "I need to take a break"),
];

/// Build the static baseline set.
pub fn default_buttons() -> Vec<WordButton> {
    DEFAULT_BUTTONS
        .iter()
        .enumerate()
        .map(|(i, (word, prompt))| WordButton {
            id: i as u64 + 1,
            word: (*word).to_string(),
            prompt: (*prompt).to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// merge
// ---------------------------------------------------------------------------

/// Union of the static baseline and `detected`, deduplicated against both
/// the static words and a running seen-set. Detected entries keep their
/// assigned ids; an entry with an empty prompt falls back to "I see
/// {word}".
pub fn merge(detected: &[DetectedObjectData]) -> Vec<WordButton> {
    let mut buttons = default_buttons();
    let mut seen: Vec<String> = buttons.iter().map(|b| b.word.to_lowercase()).collect();

    for entry in detected {
        let word = entry.word.to_lowercase();
        if word.is_empty() || seen.contains(&word) {
            log::debug!("grid: skipping duplicate/empty word {:?}", entry.word);
            continue;
        }
        seen.push(word);

        let prompt = if entry.prompt.is_empty() {
            format!("I see {}", entry.word)
        } else {
            entry.prompt.clone()
        };
        buttons.push(WordButton {
            id: entry.id,
            word: entry.word.clone(),
            prompt,
        });
    }

    buttons
}

// ---------------------------------------------------------------------------
// WordGrid
// ---------------------------------------------------------------------------

/// The live button set plus its layout parameters.
pub struct WordGrid {
    config: GridConfig,
    buttons: Vec<WordButton>,
}

impl WordGrid {
    /// A grid holding only the static baseline.
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            buttons: default_buttons(),
        }
    }

    /// Rebuild the button set from a fresh detection result. The
    /// previous dynamic entries are fully discarded.
    pub fn refresh(&mut self, detected: &[DetectedObjectData]) {
        self.buttons = merge(detected);
        log::info!("grid: refreshed to {} buttons", self.buttons.len());
    }

    pub fn buttons(&self) -> &[WordButton] {
        &self.buttons
    }

    /// The button with `id`, for tap handling.
    pub fn tap(&self, id: u64) -> Option<&WordButton> {
        self.buttons.iter().find(|b| b.id == id)
    }

    /// Row-major cell positions for the current buttons, centered on the
    /// grid origin. Buttons beyond `width × height` capacity are not
    /// placed (and the overflow is logged).
    pub fn positions(&self) -> Vec<[f32; 3]> {
        let capacity = (self.config.width * self.config.height) as usize;
        if self.buttons.len() > capacity {
            log::warn!(
                "grid: {} buttons exceed {}-cell capacity; overflow not placed",
                self.buttons.len(),
                capacity
            );
        }

        let count = self.buttons.len().min(capacity);
        let half_w = (self.config.width.saturating_sub(1)) as f32 / 2.0;
        let half_h = (self.config.height.saturating_sub(1)) as f32 / 2.0;

        (0..count)
            .map(|i| {
                let col = (i as u32 % self.config.width.max(1)) as f32;
                let row = (i as u32 / self.config.width.max(1)) as f32;
                [
                    (col - half_w) * self.config.spacing_x,
                    (half_h - row) * self.config.spacing_y,
                    self.config.z_position,
                ]
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn detected(id: u64, word: &str, prompt: &str) -> DetectedObjectData {
        DetectedObjectData {
            id,
            word: word.into(),
            prompt: prompt.into(),
        }
    }

    #[test]
    fn default_set_has_twelve_buttons_with_ids_1_to_12() {
        let buttons = default_buttons();
        assert_eq!(buttons.len(), 12);
        assert_eq!(buttons[0].id, 1);
        assert_eq!(buttons[11].id, 12);
        assert_eq!(buttons[0].word, "Yes");
    }

    #[test]
    fn merge_appends_new_detected_words() {
        let merged = merge(&[detected(13, "Book", "A phrase about the book")]);
        assert_eq!(merged.len(), 13);
        assert_eq!(merged[12].word, "Book");
        assert_eq!(merged[12].id, 13);
    }

    #[test]
    fn merge_prefers_static_entries_on_conflict() {
        // "Help" is a static word; the detected duplicate must be dropped.
        let merged = merge(&[detected(13, "help", "ignored"), detected(14, "Lamp", "p")]);
        assert_eq!(merged.len(), 13);
        let helps: Vec<_> = merged
            .iter()
            .filter(|b| b.word.eq_ignore_ascii_case("help"))
            .collect();
        assert_eq!(helps.len(), 1);
        assert_eq!(helps[0].id, 3); // the static one
    }

    #[test]
    fn merge_dedups_within_detected_set() {
        let merged = merge(&[
            detected(13, "Lamp", "a"),
            detected(14, "lamp", "b"),
            detected(15, "LAMP", "c"),
        ]);
        assert_eq!(merged.len(), 13);
        assert_eq!(merged[12].word, "Lamp");
    }

    #[test]
    fn merge_never_yields_case_duplicate_words() {
        let merged = merge(&[
            detected(13, "Book", "x"),
            detected(14, "book", "y"),
            detected(15, "Stop", "z"),
        ]);
        let mut folded: Vec<String> = merged.iter().map(|b| b.word.to_lowercase()).collect();
        folded.sort();
        let before = folded.len();
        folded.dedup();
        assert_eq!(folded.len(), before);
    }

    #[test]
    fn merge_fills_in_missing_prompt() {
        let merged = merge(&[detected(13, "Lamp", "")]);
        assert_eq!(merged[12].prompt, "I see Lamp");
    }

    #[test]
    fn grid_tap_finds_button_by_id() {
        let grid = WordGrid::new(GridConfig::default());
        assert_eq!(grid.tap(3).map(|b| b.word.as_str()), Some("Help"));
        assert!(grid.tap(99).is_none());
    }

    #[test]
    fn layout_is_centered_row_major() {
        let config = GridConfig {
            width: 3,
            height: 2,
            spacing_x: 2.0,
            spacing_y: 1.0,
            z_position: 0.5,
        };
        let mut grid = WordGrid::new(config);
        grid.buttons.truncate(6);

        let positions = grid.positions();
        assert_eq!(positions.len(), 6);
        // First cell: top-left.
        assert_eq!(positions[0], [-2.0, 0.5, 0.5]);
        // Middle of first row sits on the y axis.
        assert_eq!(positions[1], [0.0, 0.5, 0.5]);
        // Last cell: bottom-right.
        assert_eq!(positions[5], [2.0, -0.5, 0.5]);
    }

    #[test]
    fn layout_truncates_to_capacity() {
        let config = GridConfig {
            width: 2,
            height: 2,
            spacing_x: 1.0,
            spacing_y: 1.0,
            z_position: 0.0,
        };
        let grid = WordGrid::new(config); // 12 static buttons, 4 cells
        assert_eq!(grid.positions().len(), 4);
    }

    #[test]
    fn refresh_discards_previous_dynamic_entries() {
        let mut grid = WordGrid::new(GridConfig::default());
        grid.refresh(&[detected(13, "Lamp", "p")]);
        assert_eq!(grid.buttons().len(), 13);

        grid.refresh(&[detected(14, "Chair", "q")]);
        assert_eq!(grid.buttons().len(), 13);
        assert_eq!(grid.buttons()[12].word, "Chair");
    }
}
