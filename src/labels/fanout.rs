//! Label fan-out: raw detection labels → stable, numbered, de-duplicated
//! display entries with a spoken phrase.
//!
//! [`LabelFanout`] listens for the orchestrator's label-detected event.
//! On each event it discards the previous entry set, deduplicates the
//! incoming labels case-insensitively (first-seen casing wins), generates
//! a phrase per unique word, assigns ids from a private strictly
//! increasing counter, and pushes the new set to the word grid.
//!
//! Ids are never reset and never reused, even when the same word recurs
//! in a later cycle — downstream consumers can treat an id as a stable
//! identity for the lifetime of the process.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::detection::LabelListener;
use crate::grid::WordGrid;

use super::phrases::PhraseBook;

// ---------------------------------------------------------------------------
// DetectedObjectData
// ---------------------------------------------------------------------------

/// A finalized display entry for one detected object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedObjectData {
    /// Strictly increasing across the process lifetime, assigned when the
    /// label is finalized.
    pub id: u64,
    /// Capitalized display form of the label.
    pub word: String,
    /// Spoken/display phrase associated with the word.
    pub prompt: String,
}

/// First id handed to a dynamic entry. The twelve static grid buttons
/// own ids 1–12.
const FIRST_DYNAMIC_ID: u64 = 13;

// ---------------------------------------------------------------------------
// LabelFanout
// ---------------------------------------------------------------------------

struct FanoutInner {
    next_id: u64,
    detected: Vec<DetectedObjectData>,
    /// Raw labels from the most recent event, kept for presence checks.
    last_labels: Vec<String>,
}

/// Turns raw label lists into [`DetectedObjectData`] entries and refreshes
/// the word grid. Implements [`LabelListener`] so the orchestrator can
/// fan out to it like any other consumer.
pub struct LabelFanout {
    phrases: PhraseBook,
    grid: Option<Arc<Mutex<WordGrid>>>,
    watchlist: Vec<String>,
    inner: Mutex<FanoutInner>,
}

impl LabelFanout {
    /// # Arguments
    ///
    /// * `grid`      — the word grid to refresh after each event, if any.
    /// * `watchlist` — object names whose presence is reported via log.
    pub fn new(grid: Option<Arc<Mutex<WordGrid>>>, watchlist: Vec<String>) -> Self {
        Self {
            phrases: PhraseBook::new(),
            grid,
            watchlist,
            inner: Mutex::new(FanoutInner {
                next_id: FIRST_DYNAMIC_ID,
                detected: Vec::new(),
                last_labels: Vec::new(),
            }),
        }
    }

    /// Snapshot of the current entry set.
    pub fn detected_objects(&self) -> Vec<DetectedObjectData> {
        self.inner.lock().unwrap().detected.clone()
    }

    /// Raw labels from the most recent event, duplicates included.
    pub fn last_labels(&self) -> Vec<String> {
        self.inner.lock().unwrap().last_labels.clone()
    }

    pub fn object_count(&self) -> usize {
        self.inner.lock().unwrap().detected.len()
    }

    /// Case-insensitive substring presence check against the entry words.
    pub fn has_object(&self, name: &str) -> bool {
        let needle = name.to_lowercase();
        self.inner
            .lock()
            .unwrap()
            .detected
            .iter()
            .any(|o| o.word.to_lowercase().contains(&needle))
    }

    /// The current entry set as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.inner.lock().unwrap().detected)
    }

    fn handle(&self, labels: &[String]) {
        let unique = dedup_first_casing(labels);
        log::info!(
            "labels: filtered {} labels to {} unique",
            labels.len(),
            unique.len()
        );

        let mut inner = self.inner.lock().unwrap();
        inner.last_labels = labels.to_vec();

        let mut next_id = inner.next_id;
        inner.detected = unique
            .into_iter()
            .map(|label| {
                let id = next_id;
                next_id += 1;
                DetectedObjectData {
                    id,
                    word: capitalize(&label),
                    prompt: self.phrases.phrase_for(&label),
                }
            })
            .collect();
        inner.next_id = next_id;

        if let Ok(json) = serde_json::to_string(&inner.detected) {
            log::debug!("labels: {json}");
        }

        self.check_watchlist(&inner.last_labels);

        let detected = inner.detected.clone();
        drop(inner);

        if let Some(grid) = &self.grid {
            grid.lock().unwrap().refresh(&detected);
        }
    }

    fn check_watchlist(&self, labels: &[String]) {
        for target in &self.watchlist {
            let needle = target.to_lowercase();
            if labels.iter().any(|l| l.to_lowercase().contains(&needle)) {
                log::info!("labels: watchlist hit: {target}");
            }
        }
    }
}

impl LabelListener for LabelFanout {
    fn on_labels_detected(&self, labels: &[String]) {
        self.handle(labels);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Case-insensitive dedup preserving first-seen casing and order.
fn dedup_first_casing(labels: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut unique = Vec::new();
    for label in labels {
        let folded = label.to_lowercase();
        if !seen.contains(&folded) {
            seen.push(folded);
            unique.push(label.clone());
        }
    }
    unique
}

/// Upper-case the first character, leave the rest untouched.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
