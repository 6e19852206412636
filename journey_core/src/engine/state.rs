//! Value types for the emotional journey: state, memory, summary, and the
//! selection context.
//!
//! Every transition in the engine returns a new record instead of mutating
//! in place, so tests can compare snapshots by equality and sessions can be
//! replayed.

use deck_rules::{Question, StageType};
use serde::{Deserialize, Serialize};

/// The emotional trajectory of the session at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionalState {
    /// Current conversational tone.
    pub phase: StageType,

    /// Experienced emotional depth, clamped to [1, 5].
    pub intensity: f32,

    /// Short-term directional trend in intensity, clamped to [-1, 1].
    pub momentum: f32,

    /// The couple's comfort headroom, clamped to [0, 1]. Gates access to
    /// deeper content.
    pub safety_level: f32,
}

/// Everything the session has shown and how the couple reacted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMemory {
    /// Shown card ids in display order. Never contains duplicates.
    pub shown_question_ids: Vec<String>,

    pub favorites_added: u32,

    pub skips_count: u32,

    /// Running mean of `intensity_samples`.
    pub average_intensity_experienced: f32,

    /// Highest depth stage ever reached. Relief cards never move this.
    pub peak_phase_reached: StageType,

    /// One intensity sample per shown card, in display order.
    pub intensity_samples: Vec<f32>,
}

impl Default for SessionMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMemory {
    /// Fresh memory for a new session.
    pub fn new() -> Self {
        Self {
            shown_question_ids: Vec::new(),
            favorites_added: 0,
            skips_count: 0,
            average_intensity_experienced: 0.0,
            peak_phase_reached: StageType::Warmup,
            intensity_samples: Vec::new(),
        }
    }

    /// Whether a card was already shown this session.
    pub fn has_shown(&self, question_id: &str) -> bool {
        self.shown_question_ids.iter().any(|id| id == question_id)
    }

    /// Copy of this memory with one more skip recorded.
    pub fn with_skip_recorded(&self) -> Self {
        Self {
            skips_count: self.skips_count + 1,
            ..self.clone()
        }
    }

    /// Copy of this memory with one more favorite recorded.
    pub fn with_favorite_recorded(&self) -> Self {
        Self {
            favorites_added: self.favorites_added + 1,
            ..self.clone()
        }
    }
}

/// Immutable end-of-session snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_cards: usize,
    pub peak_phase: StageType,
    /// Rounded to two decimals.
    pub average_intensity: f32,
    /// Rounded to two decimals.
    pub safety_level: f32,
    pub reflection_message: String,
}

/// Inputs for one candidate-selection pass.
#[derive(Debug)]
pub struct SelectionContext<'a> {
    pub emotional_state: EmotionalState,
    pub memory: &'a SessionMemory,
    /// Ceiling from relationship-stage pacing; candidates above it are
    /// filtered out before scoring.
    pub max_intensity_allowed: f32,
    /// Mood-eligible cards not yet shown this session.
    pub available_questions: &'a [Question],
}
