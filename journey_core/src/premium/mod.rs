//! Premium gate - filters content by entitlement and mood.

use deck_rules::{Mood, Question};
use serde::{Deserialize, Serialize};

/// Per-user overrides that open individual gates without full premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PremiumFeatureFlags {
    pub allow_intimate_mood: bool,
    pub allow_high_intensity: bool,
}

/// Decides what content a user may see.
#[derive(Debug, Clone, Copy)]
pub struct PremiumGate {
    is_premium: bool,
    flags: PremiumFeatureFlags,
}

impl PremiumGate {
    /// Gate with default (all-closed) feature flags.
    pub fn new(is_premium: bool) -> Self {
        Self::with_flags(is_premium, PremiumFeatureFlags::default())
    }

    /// Gate with explicit feature flags.
    pub fn with_flags(is_premium: bool, flags: PremiumFeatureFlags) -> Self {
        Self { is_premium, flags }
    }

    /// Every mood is open except INTIMATE, which needs premium or the
    /// intimate-mood flag.
    pub fn can_access_mood(&self, mood: Mood) -> bool {
        if mood != Mood::Intimate {
            return true;
        }
        self.is_premium || self.flags.allow_intimate_mood
    }

    /// Filter a deck down to what this user may see. Premium users keep the
    /// deck unchanged; everyone else loses high-intensity cards (unless the
    /// flag is set), INTIMATE-mood cards (unless the flag is set), and cards
    /// explicitly marked premium. A card without intensity counts as 1.
    pub fn filter_questions(&self, mut questions: Vec<Question>) -> Vec<Question> {
        if self.is_premium {
            return questions;
        }

        questions.retain(|question| {
            if question.intensity_or(1.0) > 3.0 && !self.flags.allow_high_intensity {
                return false;
            }
            if question.mood == Mood::Intimate && !self.flags.allow_intimate_mood {
                return false;
            }
            !question.is_premium()
        });
        questions
    }
}
