//! Relationship profile - the couple's relational parameters.

use serde::{Deserialize, Serialize};

use crate::questions::{CommunicationStyle, RelationshipStage};

/// The couple's relational parameters, captured once per session.
///
/// The two numeric fields are always kept in [0, 1]; run [`normalize`]
/// on anything read from storage before handing it to the engine.
///
/// [`normalize`]: RelationshipProfile::normalize
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelationshipProfile {
    pub stage: RelationshipStage,
    pub communication_style: CommunicationStyle,

    /// Willingness to go emotionally deep, from 0 to 1.
    pub vulnerability_tolerance: f32,

    /// Comfort with physical/romantic closeness, from 0 to 1.
    pub intimacy_comfort: f32,
}

impl RelationshipProfile {
    /// Clamp the numeric fields into [0, 1]. Idempotent; out-of-range input
    /// is silently clamped, never rejected.
    pub fn normalize(self) -> Self {
        Self {
            vulnerability_tolerance: self.vulnerability_tolerance.clamp(0.0, 1.0),
            intimacy_comfort: self.intimacy_comfort.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Hard ceiling on the intensity of cards this couple should see.
    pub fn intensity_ceiling(&self) -> f32 {
        (1.0 + self.vulnerability_tolerance * 2.2 + self.intimacy_comfort * 1.8).clamp(1.0, 5.0)
    }

    /// How deep the couple's profile allows the journey to drift.
    pub fn depth_cap(&self) -> f32 {
        2.0 + self.vulnerability_tolerance * 2.0 + self.intimacy_comfort
    }
}

impl Default for RelationshipProfile {
    fn default() -> Self {
        Self {
            stage: RelationshipStage::LongTerm,
            communication_style: CommunicationStyle::Balanced,
            vulnerability_tolerance: 0.6,
            intimacy_comfort: 0.6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_clamps() {
        let profile = RelationshipProfile {
            vulnerability_tolerance: 1.7,
            intimacy_comfort: -0.3,
            ..Default::default()
        }
        .normalize();

        assert_eq!(profile.vulnerability_tolerance, 1.0);
        assert_eq!(profile.intimacy_comfort, 0.0);
    }

    #[test]
    fn test_normalize_idempotent() {
        let profile = RelationshipProfile {
            stage: RelationshipStage::New,
            communication_style: CommunicationStyle::Light,
            vulnerability_tolerance: 2.5,
            intimacy_comfort: 0.4,
        };

        let once = profile.normalize();
        let twice = once.normalize();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_passes_other_fields() {
        let profile = RelationshipProfile {
            stage: RelationshipStage::Reconnecting,
            communication_style: CommunicationStyle::Intense,
            vulnerability_tolerance: 0.5,
            intimacy_comfort: 0.5,
        }
        .normalize();

        assert_eq!(profile.stage, RelationshipStage::Reconnecting);
        assert_eq!(profile.communication_style, CommunicationStyle::Intense);
    }

    #[test]
    fn test_intensity_ceiling_bounds() {
        let timid = RelationshipProfile {
            vulnerability_tolerance: 0.0,
            intimacy_comfort: 0.0,
            ..Default::default()
        };
        assert_eq!(timid.intensity_ceiling(), 1.0);

        let open = RelationshipProfile {
            vulnerability_tolerance: 1.0,
            intimacy_comfort: 1.0,
            ..Default::default()
        };
        assert_eq!(open.intensity_ceiling(), 5.0);
    }

    #[test]
    fn test_depth_cap() {
        let profile = RelationshipProfile::default();
        let expected = 2.0 + 0.6 * 2.0 + 0.6;
        assert!((profile.depth_cap() - expected).abs() < 0.001);
    }
}
