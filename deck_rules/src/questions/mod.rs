//! Question definitions - the prompt cards and their shared vocabulary.

use serde::{Deserialize, Serialize};

/// The three conversational moods a deck can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    #[serde(rename = "FUN")]
    Fun,
    #[serde(rename = "DEEP")]
    Deep,
    #[serde(rename = "INTIMATE")]
    Intimate,
}

impl Mood {
    /// All moods, in catalog order.
    pub fn all() -> [Mood; 3] {
        [Mood::Fun, Mood::Deep, Mood::Intimate]
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Mood::Fun => "FUN",
            Mood::Deep => "DEEP",
            Mood::Intimate => "INTIMATE",
        };
        write!(f, "{}", name)
    }
}

/// The emotional-depth stage a prompt belongs to.
///
/// Five stages form an ascending depth ladder; `relief` sits outside the
/// ladder as a cooldown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageType {
    Warmup,
    Curiosity,
    Deep,
    Vulnerable,
    Intimate,
    Relief,
}

impl StageType {
    /// Rank on the depth ladder: 0 (warmup) through 4 (intimate).
    ///
    /// `relief` has no rank - a relief card never counts as a depth
    /// milestone, so peak tracking ignores it entirely.
    pub fn depth_rank(&self) -> Option<u8> {
        match self {
            StageType::Warmup => Some(0),
            StageType::Curiosity => Some(1),
            StageType::Deep => Some(2),
            StageType::Vulnerable => Some(3),
            StageType::Intimate => Some(4),
            StageType::Relief => None,
        }
    }
}

/// The relationship stage of the couple playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipStage {
    New,
    Dating,
    LongTerm,
    Married,
    Reconnecting,
}

impl RelationshipStage {
    /// All five relationship stages.
    pub fn all() -> [RelationshipStage; 5] {
        [
            RelationshipStage::New,
            RelationshipStage::Dating,
            RelationshipStage::LongTerm,
            RelationshipStage::Married,
            RelationshipStage::Reconnecting,
        ]
    }

    /// Pacing multiplier applied to the current emotional intensity when
    /// selecting the next card. Newer and reconnecting couples move slower.
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            RelationshipStage::New => 0.82,
            RelationshipStage::Dating => 0.90,
            RelationshipStage::LongTerm => 1.0,
            RelationshipStage::Married => 0.98,
            RelationshipStage::Reconnecting => 0.78,
        }
    }
}

/// How openly the couple tends to communicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationStyle {
    Light,
    Balanced,
    Intense,
}

impl CommunicationStyle {
    /// Starting emotional intensity for a fresh session.
    pub fn baseline_intensity(&self) -> f32 {
        match self {
            CommunicationStyle::Light => 1.4,
            CommunicationStyle::Balanced => 1.9,
            CommunicationStyle::Intense => 2.4,
        }
    }
}

/// Supported display languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    El,
}

/// Bilingual prompt text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    pub el: String,
}

impl LocalizedText {
    /// Create bilingual text from the two translations.
    pub fn new(en: impl Into<String>, el: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            el: el.into(),
        }
    }

    /// Get the text for a language.
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::En => &self.en,
            Language::El => &self.el,
        }
    }
}

/// A single prompt card.
///
/// Authors only have to supply `id`, `mood`, and `text`; everything else is
/// optional and filled in deterministically by the deck normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique within the card's mood.
    pub id: String,

    pub mood: Mood,

    pub text: LocalizedText,

    /// Emotional intensity from 1 to 5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u8>,

    /// Depth stage the card targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<StageType>,

    /// Relationship stages the card works for. Missing means all of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_suitability: Option<Vec<RelationshipStage>>,

    /// Whether the card is gated behind premium access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium: Option<bool>,

    /// Authoring bias added to the card's selection score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
}

impl Question {
    /// Create a minimal question with only the required fields.
    pub fn new(id: impl Into<String>, mood: Mood, text: LocalizedText) -> Self {
        Self {
            id: id.into(),
            mood,
            text,
            intensity: None,
            stage: None,
            relationship_suitability: None,
            premium: None,
            weight: None,
        }
    }

    /// Set the intensity.
    pub fn with_intensity(mut self, intensity: u8) -> Self {
        self.intensity = Some(intensity);
        self
    }

    /// Set the stage.
    pub fn with_stage(mut self, stage: StageType) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Set the premium flag.
    pub fn with_premium(mut self, premium: bool) -> Self {
        self.premium = Some(premium);
        self
    }

    /// Set the authoring weight.
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Intensity, or the caller's fallback when the card has none.
    pub fn intensity_or(&self, default: f32) -> f32 {
        self.intensity.map(f32::from).unwrap_or(default)
    }

    /// Stage, or the caller's fallback when the card has none.
    pub fn stage_or(&self, default: StageType) -> StageType {
        self.stage.unwrap_or(default)
    }

    /// Authoring weight, defaulting to 0.
    pub fn weight_or_default(&self) -> f32 {
        self.weight.unwrap_or(0.0)
    }

    /// Whether the card is premium-gated (missing flag means not gated).
    pub fn is_premium(&self) -> bool {
        self.premium.unwrap_or(false)
    }

    /// Whether the card suits a relationship stage. A card without explicit
    /// suitability suits everyone.
    pub fn suits(&self, stage: RelationshipStage) -> bool {
        match &self.relationship_suitability {
            Some(stages) => stages.contains(&stage),
            None => true,
        }
    }
}
