//! Emotional Journey Engine - the state machine and selection algorithm.
//!
//! One engine drives one session:
//! 1. **Advance**: after each shown card, intensity drifts toward a dynamic
//!    target shaped by mood, profile, and momentum
//! 2. **Safety**: skips erode the couple's safety level, favorites rebuild it
//! 3. **Selection**: candidates are scored for stage match, intensity
//!    proximity, novelty, and safety compatibility, then sampled through a
//!    softmax so replays stay varied
//! 4. **Summary**: the session ends with a reflection built from how the
//!    couple actually played

mod state;

pub use state::*;

use deck_rules::{Mood, Question, RelationshipProfile, StageType};
use rand::Rng;

/// Softmax temperature for candidate sampling. Lower values approach
/// arg-max; this keeps a clear preference for on-pace cards while leaving
/// room for variety.
const SELECTION_TEMPERATURE: f32 = 0.85;

/// Symmetric jitter added to every candidate score to break ties.
const SCORE_JITTER: f32 = 0.35;

const REFLECTION_BOUNDARIES: &str =
    "You honored your limits and still stayed connected. That is emotional maturity.";
const REFLECTION_COURAGE: &str =
    "You both leaned in with courage and curiosity. This is how deeper trust is built.";
const REFLECTION_STEADY: &str =
    "You kept a steady emotional rhythm and created meaningful space for each other.";

fn clamp_intensity(value: f32) -> f32 {
    value.clamp(1.0, 5.0)
}

/// Base selection weight per stage, applied when a candidate's stage does
/// not match the current phase.
fn stage_weight(stage: StageType) -> f32 {
    match stage {
        StageType::Warmup => 0.7,
        StageType::Curiosity => 1.0,
        StageType::Deep => 1.2,
        StageType::Vulnerable => 1.35,
        StageType::Intimate => 1.45,
        StageType::Relief => 0.8,
    }
}

/// Drives the emotional trajectory of a single session.
pub struct EmotionalJourneyEngine {
    mood: Mood,
    profile: RelationshipProfile,
}

impl EmotionalJourneyEngine {
    /// Create an engine for a mood and profile. The profile is normalized
    /// on the way in, so out-of-range tolerances are safe to pass.
    pub fn new(mood: Mood, profile: RelationshipProfile) -> Self {
        Self {
            mood,
            profile: profile.normalize(),
        }
    }

    /// Starting state for a fresh session. The intensity baseline follows
    /// the couple's communication style.
    pub fn initial_state(&self) -> EmotionalState {
        EmotionalState {
            phase: StageType::Warmup,
            intensity: self.profile.communication_style.baseline_intensity(),
            momentum: 0.1,
            safety_level: 0.65,
        }
    }

    /// Fresh memory for a new session.
    pub fn initial_memory(&self) -> SessionMemory {
        SessionMemory::new()
    }

    /// A skipped card costs safety and momentum.
    pub fn apply_skip_penalty(&self, state: EmotionalState) -> EmotionalState {
        EmotionalState {
            safety_level: (state.safety_level - 0.08).max(0.2),
            momentum: (state.momentum - 0.15).max(-1.0),
            ..state
        }
    }

    /// A favorited card rebuilds safety and momentum.
    pub fn apply_favorite_reward(&self, state: EmotionalState) -> EmotionalState {
        EmotionalState {
            safety_level: (state.safety_level + 0.06).min(1.0),
            momentum: (state.momentum + 0.12).min(1.0),
            ..state
        }
    }

    /// Advance the state machine after a card was shown.
    ///
    /// Intensity drifts toward the dynamic target, nudged by the shown
    /// card's own intensity. Low safety pulls the journey back down and can
    /// force the relief phase; relief cards themselves release pressure.
    /// Safety is not touched here - only skips and favorites move it.
    pub fn advance_state(&self, state: EmotionalState, asked: &Question) -> EmotionalState {
        let question_intensity = asked.intensity_or(2.0);
        let target = self.dynamic_target_intensity(&state);
        let drift = (target - state.intensity) * 0.35;
        let momentum_shift = (question_intensity - state.intensity) * 0.12;

        let relief_boost = if state.safety_level < 0.45 {
            0.45
        } else if state.safety_level < 0.6 {
            0.25
        } else {
            0.0
        };
        let relief_pressure = if asked.stage_or(StageType::Warmup) == StageType::Relief {
            -0.25
        } else {
            0.12
        };

        let next_intensity = clamp_intensity(
            state.intensity + drift + momentum_shift + relief_pressure - relief_boost,
        );

        EmotionalState {
            phase: pick_phase(next_intensity, state.safety_level),
            intensity: next_intensity,
            momentum: (state.momentum + momentum_shift).clamp(-1.0, 1.0),
            safety_level: state.safety_level,
        }
    }

    /// Select the next card, or `None` when the eligible pool is exhausted.
    ///
    /// Candidates above the intensity ceiling are dropped, the rest are
    /// scored and sampled through a softmax. The random source is explicit
    /// so tests can seed it.
    pub fn select_question<R: Rng>(
        &self,
        context: &SelectionContext<'_>,
        rng: &mut R,
    ) -> Option<Question> {
        if context.available_questions.is_empty() {
            return None;
        }

        let candidates: Vec<&Question> = context
            .available_questions
            .iter()
            .filter(|question| {
                let intensity = question.intensity_or(context.emotional_state.intensity);
                intensity <= context.max_intensity_allowed
            })
            .collect();

        if candidates.is_empty() {
            return None;
        }

        let mut scored: Vec<(&Question, f32)> = Vec::with_capacity(candidates.len());
        for question in candidates {
            let score = self.score_candidate(question, context, rng);
            scored.push((question, score));
        }

        Some(pick_softmax(&scored, SELECTION_TEMPERATURE, rng).clone())
    }

    /// Record that a card was shown: append its id and intensity sample,
    /// refresh the running average, and raise the peak phase if the card
    /// sits higher on the depth ladder.
    pub fn record_exposure(&self, memory: &SessionMemory, question: &Question) -> SessionMemory {
        let intensity = question.intensity_or(2.0);

        let mut samples = memory.intensity_samples.clone();
        samples.push(intensity);
        let average = samples.iter().sum::<f32>() / samples.len() as f32;

        let mut shown = memory.shown_question_ids.clone();
        shown.push(question.id.clone());

        SessionMemory {
            shown_question_ids: shown,
            intensity_samples: samples,
            average_intensity_experienced: average,
            peak_phase_reached: raise_peak(
                memory.peak_phase_reached,
                question.stage_or(StageType::Warmup),
            ),
            ..memory.clone()
        }
    }

    /// Build the end-of-session summary.
    pub fn build_summary(
        &self,
        memory: &SessionMemory,
        final_state: &EmotionalState,
    ) -> SessionSummary {
        let average_intensity = if memory.intensity_samples.is_empty() {
            final_state.intensity
        } else {
            memory.intensity_samples.iter().sum::<f32>() / memory.intensity_samples.len() as f32
        };

        SessionSummary {
            total_cards: memory.shown_question_ids.len(),
            peak_phase: memory.peak_phase_reached,
            average_intensity: round_two(average_intensity),
            safety_level: round_two(final_state.safety_level),
            reflection_message: reflection(memory, final_state, average_intensity).to_string(),
        }
    }

    fn score_candidate<R: Rng>(
        &self,
        question: &Question,
        context: &SelectionContext<'_>,
        rng: &mut R,
    ) -> f32 {
        let stage = question.stage_or(StageType::Warmup);
        let intensity = question.intensity_or(2.0);
        let state = &context.emotional_state;

        let stage_match_weight = if stage == state.phase {
            2.2
        } else {
            0.9 * stage_weight(stage)
        };
        let intensity_proximity_weight = 2.0 - (state.intensity - intensity).abs().min(2.0);
        // Shown cards are pre-filtered out of the pool; the penalty guards
        // against a caller passing an unfiltered pool.
        let novelty_weight = if context.memory.has_shown(&question.id) {
            -3.0
        } else {
            1.4
        };
        let safety_compatibility_weight = if state.safety_level >= intensity / 5.0 {
            1.2
        } else {
            -1.6
        };
        let jitter = (rng.gen::<f32>() - 0.5) * SCORE_JITTER;

        stage_match_weight
            + intensity_proximity_weight
            + novelty_weight
            + safety_compatibility_weight
            + jitter
            + question.weight_or_default()
    }

    /// Where the journey wants intensity to be right now: the lower of the
    /// mood's cap and the profile's depth cap, pushed by momentum.
    fn dynamic_target_intensity(&self, state: &EmotionalState) -> f32 {
        let mood_cap: f32 = match self.mood {
            Mood::Fun => 2.5,
            Mood::Deep => 4.2,
            Mood::Intimate => 4.6,
        };
        clamp_intensity(mood_cap.min(self.profile.depth_cap()) + state.momentum * 0.5)
    }
}

/// Sample one candidate with probability proportional to exp(score / t).
///
/// Falls back to the last candidate when floating-point residue leaves the
/// cumulative sum short of the drawn value.
fn pick_softmax<'a, R: Rng>(
    scored: &[(&'a Question, f32)],
    temperature: f32,
    rng: &mut R,
) -> &'a Question {
    let exps: Vec<f32> = scored
        .iter()
        .map(|(_, score)| (score / temperature).exp())
        .collect();
    let sum: f32 = exps.iter().sum();
    let mut remaining = rng.gen::<f32>() * sum;

    for ((question, _), exp) in scored.iter().zip(&exps) {
        remaining -= exp;
        if remaining <= 0.0 {
            return question;
        }
    }

    scored[scored.len() - 1].0
}

/// Phase for the new intensity. Low safety overrides everything and forces
/// a relief cooldown.
fn pick_phase(intensity: f32, safety_level: f32) -> StageType {
    if safety_level < 0.42 {
        StageType::Relief
    } else if intensity < 1.9 {
        StageType::Warmup
    } else if intensity < 2.5 {
        StageType::Curiosity
    } else if intensity < 3.25 {
        StageType::Deep
    } else if intensity < 3.9 {
        StageType::Vulnerable
    } else {
        StageType::Intimate
    }
}

/// Raise the recorded peak if the candidate ranks higher on the depth
/// ladder. Relief has no rank and never moves the peak in either direction.
fn raise_peak(current: StageType, candidate: StageType) -> StageType {
    match (current.depth_rank(), candidate.depth_rank()) {
        (Some(current_rank), Some(candidate_rank)) if candidate_rank > current_rank => candidate,
        _ => current,
    }
}

/// The three reflection categories, evaluated in fixed priority order.
fn reflection(
    memory: &SessionMemory,
    final_state: &EmotionalState,
    average_intensity: f32,
) -> &'static str {
    let shown = memory.shown_question_ids.len() as f32;
    if memory.skips_count as f32 > shown * 0.35 || final_state.safety_level < 0.45 {
        REFLECTION_BOUNDARIES
    } else if memory.favorites_added >= 3 && average_intensity >= 3.0 {
        REFLECTION_COURAGE
    } else {
        REFLECTION_STEADY
    }
}

fn round_two(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
