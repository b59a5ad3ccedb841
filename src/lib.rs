//! vision-assist — detection orchestration for an AR visual assistant.
//!
//! A head-worn camera frame plus a prompt goes to a vision-language
//! model; the labeled points that come back are anchored in world space
//! through a depth-frame cache and fanned out to a response bubble, a
//! world-label spawner, and a word grid whose buttons speak through a
//! TTS engine.
//!
//! # Architecture
//!
//! ```text
//! trigger ──▶ DetectionOrchestrator ──▶ VisionClient (HTTP)
//!                │        ▲                  │
//!                │        └── completion ◀───┘
//!                │
//!                ├─ DepthCache: capture → resolve → dispose
//!                ├─ ResponseSink (bubble)
//!                ├─ WorldLabelSink (world-anchored labels)
//!                └─ LabelListener ──▶ LabelFanout ──▶ WordGrid
//!                                                        │ tap
//!                                                        ▼
//!                                               SpeechController (TTS)
//! ```
//!
//! The AR engine's scene graph, rendering, and audio playback stay
//! outside this crate: the host reads [`detection::UiState`], places
//! buttons at [`grid::WordGrid::positions`], and plays
//! [`speech::SpeechClip`]s.

pub mod config;
pub mod depth;
pub mod detection;
pub mod grid;
pub mod labels;
pub mod speech;
pub mod vision;
