//! Summary storage - keeps the latest session summary for later retrieval.
//!
//! In-memory only; durable persistence is the embedding application's
//! concern, and the session treats writes as fire-and-forget.

use crate::engine::SessionSummary;

/// Holds the most recent session summary.
#[derive(Debug, Clone, Default)]
pub struct SummaryStore {
    latest: Option<SessionSummary>,
}

impl SummaryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored summary.
    pub fn save(&mut self, summary: SessionSummary) {
        self.latest = Some(summary);
    }

    /// The most recently saved summary, if any.
    pub fn latest(&self) -> Option<&SessionSummary> {
        self.latest.as_ref()
    }

    /// Forget the stored summary.
    pub fn reset(&mut self) {
        self.latest = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_rules::StageType;

    fn summary(total_cards: usize) -> SessionSummary {
        SessionSummary {
            total_cards,
            peak_phase: StageType::Curiosity,
            average_intensity: 2.0,
            safety_level: 0.65,
            reflection_message: "steady".to_string(),
        }
    }

    #[test]
    fn test_round_trip() {
        let mut store = SummaryStore::new();
        assert!(store.latest().is_none());

        store.save(summary(3));
        assert_eq!(store.latest().map(|s| s.total_cards), Some(3));

        store.save(summary(5));
        assert_eq!(store.latest().map(|s| s.total_cards), Some(5));
    }

    #[test]
    fn test_reset() {
        let mut store = SummaryStore::new();
        store.save(summary(2));
        store.reset();
        assert!(store.latest().is_none());
    }
}
