//! Label fan-out and phrase generation.
//!
//! This module provides:
//! * [`LabelFanout`] — consumes the orchestrator's label-detected event:
//!   dedup, phrase generation, id assignment, grid refresh.
//! * [`PhraseBook`] — static phrase table + generic template fallback.
//! * [`DetectedObjectData`] — the finalized display entry.
//!
//! Two dedup layers exist on purpose: [`LabelFanout`] guarantees internal
//! consistency of one detection cycle; the grid's merge pass guarantees
//! the combined static + dynamic display never repeats a word.

pub mod fanout;
pub mod phrases;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use fanout::{DetectedObjectData, LabelFanout};
pub use phrases::PhraseBook;
