//! Deck normalization - fills in missing per-card metadata.
//!
//! Authors curate decks with most metadata left out; the normalizer derives
//! stage, intensity, suitability, premium flag, and weight deterministically
//! from each card's position in the deck. Re-normalizing an already
//! normalized deck is a no-op: present fields are never overwritten.

use crate::questions::{Mood, Question, RelationshipStage, StageType};

/// The stage sequence a mood's deck walks through, start to finish.
pub fn stage_sequence(mood: Mood) -> &'static [StageType] {
    match mood {
        Mood::Fun => &[StageType::Warmup, StageType::Curiosity, StageType::Relief],
        Mood::Deep => &[
            StageType::Warmup,
            StageType::Curiosity,
            StageType::Deep,
            StageType::Relief,
            StageType::Vulnerable,
            StageType::Relief,
        ],
        Mood::Intimate => &[
            StageType::Warmup,
            StageType::Curiosity,
            StageType::Intimate,
            StageType::Relief,
        ],
    }
}

/// Highest default intensity a mood's deck ramps up to.
pub fn intensity_cap(mood: Mood) -> u8 {
    match mood {
        Mood::Fun => 2,
        Mood::Deep | Mood::Intimate => 4,
    }
}

/// Stage for the card at `index` in a deck of `total` cards.
///
/// The deck is divided into `ceil(total / sequence_len)`-sized buckets and
/// each bucket maps to one entry of the mood's stage sequence, clamped to
/// the last entry.
fn stage_from_progress(mood: Mood, index: usize, total: usize) -> StageType {
    let sequence = stage_sequence(mood);
    let bucket_size = (total + sequence.len() - 1) / sequence.len();
    let bucket_size = bucket_size.max(1);
    let sequence_index = (index / bucket_size).min(sequence.len() - 1);
    sequence[sequence_index]
}

/// Intensity for the card at `index`: linear ramp from 1 up to the mood's
/// cap across the deck, rounded to the nearest step.
fn intensity_from_progress(mood: Mood, index: usize, total: usize) -> u8 {
    let cap = intensity_cap(mood);
    if total <= 1 {
        return 1;
    }

    let ratio = index as f32 / (total - 1) as f32;
    let raw = 1.0 + (ratio * (cap - 1) as f32).round();
    (raw as u8).clamp(1, cap)
}

/// Normalize one card given its position in the deck.
fn normalize_question(question: &Question, index: usize, total: usize) -> Question {
    let mood = question.mood;
    Question {
        relationship_suitability: question
            .relationship_suitability
            .clone()
            .or_else(|| Some(RelationshipStage::all().to_vec())),
        stage: question
            .stage
            .or_else(|| Some(stage_from_progress(mood, index, total))),
        intensity: question
            .intensity
            .or_else(|| Some(intensity_from_progress(mood, index, total))),
        premium: question.premium.or(Some(mood == Mood::Intimate)),
        weight: question.weight.or(Some(0.0)),
        ..question.clone()
    }
}

/// Normalize a whole deck. Depends only on deck content and position, never
/// on session state.
pub fn normalize_deck(deck: &[Question]) -> Vec<Question> {
    let total = deck.len();
    deck.iter()
        .enumerate()
        .map(|(index, question)| normalize_question(question, index, total))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::LocalizedText;

    fn bare_deck(mood: Mood, count: usize) -> Vec<Question> {
        (0..count)
            .map(|i| {
                Question::new(
                    format!("q{}", i),
                    mood,
                    LocalizedText::new(format!("en {}", i), format!("el {}", i)),
                )
            })
            .collect()
    }

    #[test]
    fn test_all_fields_populated() {
        for mood in Mood::all() {
            let deck = normalize_deck(&bare_deck(mood, 9));
            let sequence = stage_sequence(mood);
            let cap = intensity_cap(mood);

            for question in &deck {
                let stage = question.stage.unwrap();
                assert!(sequence.contains(&stage));

                let intensity = question.intensity.unwrap();
                assert!((1..=cap).contains(&intensity));

                assert!(!question.relationship_suitability.as_ref().unwrap().is_empty());
                assert!(question.premium.is_some());
                assert!(question.weight.is_some());
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_deck(&bare_deck(Mood::Deep, 12));
        let twice = normalize_deck(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_present_fields_untouched() {
        let mut deck = bare_deck(Mood::Fun, 6);
        deck[0] = deck[0]
            .clone()
            .with_intensity(5)
            .with_stage(StageType::Vulnerable)
            .with_premium(true)
            .with_weight(2.0);

        let normalized = normalize_deck(&deck);
        assert_eq!(normalized[0].intensity, Some(5));
        assert_eq!(normalized[0].stage, Some(StageType::Vulnerable));
        assert_eq!(normalized[0].premium, Some(true));
        assert_eq!(normalized[0].weight, Some(2.0));
    }

    #[test]
    fn test_stage_walks_sequence_in_order() {
        let deck = normalize_deck(&bare_deck(Mood::Fun, 9));

        // 9 cards over a 3-stage sequence: 3 per bucket.
        for question in &deck[0..3] {
            assert_eq!(question.stage, Some(StageType::Warmup));
        }
        for question in &deck[3..6] {
            assert_eq!(question.stage, Some(StageType::Curiosity));
        }
        for question in &deck[6..9] {
            assert_eq!(question.stage, Some(StageType::Relief));
        }
    }

    #[test]
    fn test_overflow_clamps_to_last_stage() {
        // 7 cards over a 3-stage sequence: bucket size 3, indexes 6.. clamp.
        let deck = normalize_deck(&bare_deck(Mood::Fun, 7));
        assert_eq!(deck[6].stage, Some(StageType::Relief));
    }

    #[test]
    fn test_intensity_ramp() {
        let deck = normalize_deck(&bare_deck(Mood::Deep, 4));
        let intensities: Vec<u8> = deck.iter().map(|q| q.intensity.unwrap()).collect();
        assert_eq!(intensities, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_single_card_deck() {
        let deck = normalize_deck(&bare_deck(Mood::Intimate, 1));
        assert_eq!(deck[0].intensity, Some(1));
        assert_eq!(deck[0].stage, Some(StageType::Warmup));
    }

    #[test]
    fn test_premium_defaults_by_mood() {
        let fun = normalize_deck(&bare_deck(Mood::Fun, 3));
        assert!(fun.iter().all(|q| q.premium == Some(false)));

        let intimate = normalize_deck(&bare_deck(Mood::Intimate, 3));
        assert!(intimate.iter().all(|q| q.premium == Some(true)));
    }

    #[test]
    fn test_empty_deck() {
        assert!(normalize_deck(&[]).is_empty());
    }
}
