//! # Deck Rules
//!
//! The "Card Bible" crate - contains the prompt-card vocabulary, relationship
//! profiles, deck normalization, and the TOML deck catalog for Duet.
//! This crate is the single source of truth for card content and contains no
//! session logic.

pub mod catalog;
pub mod normalize;
pub mod profile;
pub mod questions;

pub use catalog::*;
pub use normalize::*;
pub use profile::*;
pub use questions::*;
