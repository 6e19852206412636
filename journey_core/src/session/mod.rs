//! Journey session - owns one play-through of a deck.
//!
//! The session sequences engine calls, maintains the current and upcoming
//! cards, emits analytics events, and persists the final summary. Exactly
//! one session owns one engine/state/memory triple; discard the session to
//! cancel it, there is no teardown to run.

use deck_rules::{Mood, Question, RelationshipProfile};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analytics::{EventBus, EventName};
use crate::engine::{
    EmotionalJourneyEngine, EmotionalState, SelectionContext, SessionMemory, SessionSummary,
};
use crate::memory::SummaryStore;
use crate::premium::{PremiumFeatureFlags, PremiumGate};

/// Unique identifier for a session, stamped on every analytics event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Idle,
    Active,
    Completed,
}

/// Errors surfaced by session operations. Normal gameplay (including deck
/// exhaustion) never errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The chosen mood is gated and the user has no entitlement for it.
    #[error("premium required: {message}")]
    PremiumRequired { message: String },

    /// The operation is not valid in the current lifecycle state.
    #[error("operation not valid in the current session state")]
    InvalidState,
}

/// Everything needed to spin up a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub mood: Mood,
    pub is_premium: bool,
    pub premium_flags: PremiumFeatureFlags,
    /// Pacing is derived from `profile.stage`.
    pub profile: RelationshipProfile,
    /// The normalized deck for the chosen mood.
    pub questions: Vec<Question>,
}

/// Read-only projection of the session for the UI. Recomputed after every
/// state-changing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneySnapshot {
    pub emotional_state: EmotionalState,
    pub memory: SessionMemory,
    pub current_question: Option<Question>,
    pub upcoming_question: Option<Question>,
    pub remaining_questions_count: usize,
}

/// One play-through of a deck.
pub struct JourneySession {
    id: SessionId,
    mood: Mood,
    profile: RelationshipProfile,
    engine: EmotionalJourneyEngine,
    gate: PremiumGate,
    bus: EventBus,
    store: SummaryStore,
    /// The deck after premium filtering.
    questions: Vec<Question>,
    state: EmotionalState,
    memory: SessionMemory,
    current_question: Option<Question>,
    upcoming_question: Option<Question>,
    lifecycle: Lifecycle,
    rng: StdRng,
}

impl JourneySession {
    /// Create a session with an entropy-seeded random source.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a session with a fixed seed, for reproducible runs.
    pub fn with_seed(config: SessionConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SessionConfig, rng: StdRng) -> Self {
        let profile = config.profile.normalize();
        let engine = EmotionalJourneyEngine::new(config.mood, profile);
        let gate = PremiumGate::with_flags(config.is_premium, config.premium_flags);
        let questions = gate.filter_questions(config.questions);

        let state = engine.initial_state();
        let memory = engine.initial_memory();

        Self {
            id: SessionId::new(),
            mood: config.mood,
            profile,
            engine,
            gate,
            bus: EventBus::new(),
            store: SummaryStore::new(),
            questions,
            state,
            memory,
            current_question: None,
            upcoming_question: None,
            lifecycle: Lifecycle::Idle,
            rng,
        }
    }

    /// Start the session: emit `session_started`, show the first card, and
    /// pre-compute the upcoming one.
    ///
    /// Rejects with [`SessionError::PremiumRequired`] when the gate denies
    /// the mood and [`SessionError::InvalidState`] when already started;
    /// both leave the session untouched.
    pub fn start(&mut self) -> Result<JourneySnapshot, SessionError> {
        if self.lifecycle != Lifecycle::Idle {
            return Err(SessionError::InvalidState);
        }
        if !self.gate.can_access_mood(self.mood) {
            return Err(SessionError::PremiumRequired {
                message: "Selected mood requires premium access.".to_string(),
            });
        }

        info!(session = %self.id, mood = %self.mood, "session started");
        self.emit(EventName::SessionStarted, json!({ "mood": self.mood }));

        if let Some(question) = self.pick_question() {
            self.present(question, false);
        }
        self.upcoming_question = self.pick_question();
        self.lifecycle = Lifecycle::Active;

        Ok(self.build_snapshot())
    }

    /// Promote the upcoming card to current and pre-compute the next one.
    /// Without a pre-computed card, attempts a fresh pick.
    pub fn next(&mut self) -> JourneySnapshot {
        if let Some(question) = self.upcoming_question.take() {
            self.present(question, true);
        } else {
            self.current_question = self.pick_question();
        }

        self.upcoming_question = self.pick_question();
        self.build_snapshot()
    }

    /// Skip the current card: safety penalty, then advance like [`next`].
    ///
    /// [`next`]: JourneySession::next
    pub fn skip(&mut self) -> JourneySnapshot {
        self.memory = self.memory.with_skip_recorded();
        self.state = self.engine.apply_skip_penalty(self.state);

        let current_id = self.current_question.as_ref().map(|q| q.id.clone());
        debug!(session = %self.id, question = ?current_id, "card skipped");
        self.emit(EventName::CardSkipped, json!({ "currentQuestionId": current_id }));

        self.next()
    }

    /// Favorite the current card: safety reward, no card change.
    pub fn favorite(&mut self) -> JourneySnapshot {
        self.memory = self.memory.with_favorite_recorded();
        self.state = self.engine.apply_favorite_reward(self.state);

        let current_id = self.current_question.as_ref().map(|q| q.id.clone());
        debug!(session = %self.id, question = ?current_id, "card favorited");
        self.emit(EventName::CardFavorited, json!({ "questionId": current_id }));

        self.build_snapshot()
    }

    /// Build and persist the end-of-session summary. Calling twice
    /// recomputes and re-emits; idempotence is not guaranteed.
    pub fn complete(&mut self) -> SessionSummary {
        let summary = self.engine.build_summary(&self.memory, &self.state);
        self.store.save(summary.clone());

        let payload = serde_json::to_value(&summary).unwrap_or(Value::Null);
        self.emit(EventName::SessionCompleted, payload);
        info!(
            session = %self.id,
            total_cards = summary.total_cards,
            "session completed"
        );

        self.lifecycle = Lifecycle::Completed;
        summary
    }

    /// Current read-only projection of the session.
    pub fn get_snapshot(&self) -> JourneySnapshot {
        self.build_snapshot()
    }

    /// The most recently persisted summary, if any.
    pub fn latest_summary(&self) -> Option<SessionSummary> {
        self.store.latest().cloned()
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The analytics bus, for reading emitted events.
    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    /// Mutable analytics bus, for registering subscribers.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Show a card: record exposure, emit `card_viewed`, advance the state
    /// machine, and optionally report a phase change.
    fn present(&mut self, question: Question, emit_phase_change: bool) {
        self.memory = self.engine.record_exposure(&self.memory, &question);
        debug!(session = %self.id, question = %question.id, "card viewed");
        self.emit(EventName::CardViewed, json!({ "questionId": question.id }));

        let previous_phase = self.state.phase;
        self.state = self.engine.advance_state(self.state, &question);
        if emit_phase_change && previous_phase != self.state.phase {
            self.emit(
                EventName::PhaseChanged,
                json!({ "from": previous_phase, "to": self.state.phase }),
            );
        }

        self.current_question = Some(question);
    }

    /// Ask the engine for the next card under relationship-stage pacing:
    /// the context intensity is scaled by the stage's speed multiplier and
    /// capped by the profile's intensity ceiling.
    fn pick_question(&mut self) -> Option<Question> {
        let paced_state = EmotionalState {
            intensity: self.state.intensity * self.profile.stage.speed_multiplier(),
            ..self.state
        };
        let available: Vec<Question> = self
            .questions
            .iter()
            .filter(|question| !self.memory.has_shown(&question.id))
            .cloned()
            .collect();

        let context = SelectionContext {
            emotional_state: paced_state,
            memory: &self.memory,
            max_intensity_allowed: self.profile.intensity_ceiling(),
            available_questions: &available,
        };

        self.engine.select_question(&context, &mut self.rng)
    }

    fn remaining_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|question| !self.memory.has_shown(&question.id))
            .count()
    }

    fn build_snapshot(&self) -> JourneySnapshot {
        JourneySnapshot {
            emotional_state: self.state,
            memory: self.memory.clone(),
            current_question: self.current_question.clone(),
            upcoming_question: self.upcoming_question.clone(),
            remaining_questions_count: self.remaining_count(),
        }
    }

    fn emit(&mut self, name: EventName, mut payload: Value) {
        if let Some(object) = payload.as_object_mut() {
            object.insert("sessionId".to_string(), json!(self.id.to_string()));
        }
        self.bus.emit(name, payload);
    }
}
