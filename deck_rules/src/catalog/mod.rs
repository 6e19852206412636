//! Deck catalog - loads curated decks from TOML.
//!
//! A catalog document groups raw questions into per-mood decks. The built-in
//! bilingual catalog ships embedded in the crate; external catalogs go
//! through the same parser and validation.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::normalize::normalize_deck;
use crate::questions::{LocalizedText, Mood, Question, RelationshipStage, StageType};

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.toml");

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate question id '{id}' in {mood} deck")]
    DuplicateQuestionId { mood: Mood, id: String },
}

/// A question as authored in a catalog document. The mood comes from the
/// enclosing deck, everything optional is filled by the normalizer later.
#[derive(Debug, Deserialize)]
struct CatalogQuestion {
    id: String,
    text: LocalizedText,
    #[serde(default)]
    intensity: Option<u8>,
    #[serde(default)]
    stage: Option<StageType>,
    #[serde(default)]
    relationship_suitability: Option<Vec<RelationshipStage>>,
    #[serde(default)]
    premium: Option<bool>,
    #[serde(default)]
    weight: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct CatalogDeck {
    mood: Mood,
    #[serde(default)]
    questions: Vec<CatalogQuestion>,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    decks: Vec<CatalogDeck>,
}

/// A validated set of raw decks, one per mood.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    decks: HashMap<Mood, Vec<Question>>,
}

impl Catalog {
    /// Parse a catalog from a TOML document and validate id uniqueness
    /// within each mood.
    pub fn from_toml_str(input: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = toml::from_str(input)?;

        let mut decks: HashMap<Mood, Vec<Question>> = HashMap::new();
        let mut seen_ids: HashMap<Mood, HashSet<String>> = HashMap::new();

        for deck in document.decks {
            let mood = deck.mood;
            let ids = seen_ids.entry(mood).or_default();
            let questions = decks.entry(mood).or_default();

            for entry in deck.questions {
                if !ids.insert(entry.id.clone()) {
                    return Err(CatalogError::DuplicateQuestionId { mood, id: entry.id });
                }
                questions.push(Question {
                    id: entry.id,
                    mood,
                    text: entry.text,
                    intensity: entry.intensity,
                    stage: entry.stage,
                    relationship_suitability: entry.relationship_suitability,
                    premium: entry.premium,
                    weight: entry.weight,
                });
            }
        }

        Ok(Self { decks })
    }

    /// The catalog embedded in this crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Raw deck for a mood. Empty when the catalog has no deck for it.
    pub fn deck(&self, mood: Mood) -> &[Question] {
        self.decks.get(&mood).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fully normalized deck for a mood, ready for the engine.
    pub fn normalized_deck(&self, mood: Mood) -> Vec<Question> {
        normalize_deck(self.deck(mood))
    }

    /// Moods that have at least one card.
    pub fn moods(&self) -> Vec<Mood> {
        Mood::all()
            .into_iter()
            .filter(|mood| !self.deck(*mood).is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        for mood in Mood::all() {
            assert!(
                !catalog.deck(mood).is_empty(),
                "built-in catalog should cover {}",
                mood
            );
        }
    }

    #[test]
    fn test_builtin_normalizes_for_every_mood() {
        let catalog = Catalog::builtin().unwrap();
        for mood in Mood::all() {
            let deck = catalog.normalized_deck(mood);
            for question in &deck {
                assert!(question.stage.is_some());
                assert!(question.intensity.is_some());
                assert!(question.relationship_suitability.is_some());
            }
        }
    }

    #[test]
    fn test_parse_minimal_catalog() {
        let catalog = Catalog::from_toml_str(
            r#"
            [[decks]]
            mood = "FUN"

            [[decks.questions]]
            id = "f1"
            text = { en = "Hello", el = "Γεια" }
            "#,
        )
        .unwrap();

        let deck = catalog.deck(Mood::Fun);
        assert_eq!(deck.len(), 1);
        assert_eq!(deck[0].id, "f1");
        assert_eq!(deck[0].mood, Mood::Fun);
        assert!(deck[0].intensity.is_none());
    }

    #[test]
    fn test_parse_optional_fields() {
        let catalog = Catalog::from_toml_str(
            r#"
            [[decks]]
            mood = "DEEP"

            [[decks.questions]]
            id = "d1"
            text = { en = "A", el = "Α" }
            intensity = 4
            stage = "vulnerable"
            premium = true
            weight = 0.5
            relationship_suitability = ["married", "longTerm"]
            "#,
        )
        .unwrap();

        let question = &catalog.deck(Mood::Deep)[0];
        assert_eq!(question.intensity, Some(4));
        assert_eq!(question.stage, Some(StageType::Vulnerable));
        assert_eq!(question.premium, Some(true));
        assert_eq!(question.weight, Some(0.5));
        assert!(question.suits(RelationshipStage::Married));
        assert!(!question.suits(RelationshipStage::New));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = Catalog::from_toml_str(
            r#"
            [[decks]]
            mood = "FUN"

            [[decks.questions]]
            id = "f1"
            text = { en = "A", el = "Α" }

            [[decks.questions]]
            id = "f1"
            text = { en = "B", el = "Β" }
            "#,
        );

        assert!(matches!(
            result,
            Err(CatalogError::DuplicateQuestionId { mood: Mood::Fun, .. })
        ));
    }

    #[test]
    fn test_same_id_across_moods_allowed() {
        let catalog = Catalog::from_toml_str(
            r#"
            [[decks]]
            mood = "FUN"

            [[decks.questions]]
            id = "shared"
            text = { en = "A", el = "Α" }

            [[decks]]
            mood = "DEEP"

            [[decks.questions]]
            id = "shared"
            text = { en = "B", el = "Β" }
            "#,
        )
        .unwrap();

        assert_eq!(catalog.deck(Mood::Fun).len(), 1);
        assert_eq!(catalog.deck(Mood::Deep).len(), 1);
    }

    #[test]
    fn test_missing_mood_is_empty() {
        let catalog = Catalog::from_toml_str("").unwrap();
        assert!(catalog.deck(Mood::Intimate).is_empty());
        assert!(catalog.moods().is_empty());
    }
}
