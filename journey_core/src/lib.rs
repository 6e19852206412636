//! # Journey Core
//!
//! The adaptive session engine for Duet, a two-player conversational card
//! game. This crate consumes decks from `deck_rules` and drives one
//! play-through at a time.
//!
//! ## Core Components
//!
//! - **engine**: the emotional state machine, candidate scoring, softmax
//!   selection, and summary building
//! - **session**: the orchestrator owning one engine/state/memory triple
//! - **premium**: entitlement and mood gating
//! - **analytics**: synchronous fire-and-forget event bus
//! - **memory**: latest-summary storage
//!
//! ## Design Philosophy
//!
//! - **Single-owner state**: one session owns one engine, state, and memory;
//!   concurrent sessions use independent instances
//! - **Value transitions**: state and memory are immutable records; every
//!   transition returns a new one
//! - **Injectable randomness**: stochastic selection takes an explicit
//!   random source so tests can seed determinism

pub mod analytics;
pub mod engine;
pub mod memory;
pub mod premium;
pub mod session;

pub use analytics::*;
pub use engine::*;
pub use memory::*;
pub use premium::*;
pub use session::*;
