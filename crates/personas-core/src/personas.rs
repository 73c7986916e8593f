//! Derived per-participant features and the persona profiles built from them.
//!
//! The six feature names in [`FEATURE_NAMES`] are shared with the external
//! quiz matcher, which compares user answers against exported
//! characteristics by name. They must not be renamed or reordered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Clustering dimensions, in vector order.
pub const FEATURE_NAMES: [&str; 6] = [
    "consensus_alignment",
    "participation_level",
    "avg_sentiment",
    "avg_text_length",
    "vote_consistency",
    "engagement_depth",
];

/// Behavioral features for one participant over all loaded rounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantFeatures {
    pub participant_id: String,
    /// Share of votes that were `Agree`, in [0, 1].
    pub consensus_alignment: f64,
    /// Votes plus text contributions over 100, saturating at 1.
    pub participation_level: f64,
    /// Mean polarity of usable texts, in [-1, 1].
    pub avg_sentiment: f64,
    /// Mean word count of usable texts over 100, saturating at 1.
    pub avg_text_length: f64,
    /// One minus the standard deviation of agree/other votes.
    pub vote_consistency: f64,
    /// Text contributions per vote cast.
    pub engagement_depth: f64,
    pub text_contributions: usize,
}

impl ParticipantFeatures {
    /// The clustering vector, ordered as [`FEATURE_NAMES`].
    #[must_use]
    pub fn vector(&self) -> [f64; 6] {
        [
            self.consensus_alignment,
            self.participation_level,
            self.avg_sentiment,
            self.avg_text_length,
            self.vote_consistency,
            self.engagement_depth,
        ]
    }
}

/// Cluster-mean feature values in original (unstandardized) units.
///
/// Field order matches [`FEATURE_NAMES`] and is the serialized order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Characteristics {
    pub consensus_alignment: f64,
    pub participation_level: f64,
    pub avg_sentiment: f64,
    pub avg_text_length: f64,
    pub vote_consistency: f64,
    pub engagement_depth: f64,
}

impl Characteristics {
    #[must_use]
    pub fn from_vector(v: [f64; 6]) -> Self {
        Self {
            consensus_alignment: v[0],
            participation_level: v[1],
            avg_sentiment: v[2],
            avg_text_length: v[3],
            vote_consistency: v[4],
            engagement_depth: v[5],
        }
    }

    #[must_use]
    pub fn to_vector(&self) -> [f64; 6] {
        [
            self.consensus_alignment,
            self.participation_level,
            self.avg_sentiment,
            self.avg_text_length,
            self.vote_consistency,
            self.engagement_depth,
        ]
    }

    /// `(name, value)` pairs in [`FEATURE_NAMES`] order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.to_vector())
    }
}

/// Human-readable meaning of each feature, shipped with every export so the
/// artifact can be read without outside lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureGlossary {
    pub consensus_alignment: String,
    pub participation_level: String,
    pub avg_sentiment: String,
    pub avg_text_length: String,
    pub vote_consistency: String,
    pub engagement_depth: String,
}

impl Default for FeatureGlossary {
    fn default() -> Self {
        Self {
            consensus_alignment: "How often participant agrees with majority".to_string(),
            participation_level: "Overall activity level in discussions".to_string(),
            avg_sentiment: "Emotional tone of contributions".to_string(),
            avg_text_length: "Typical length of written responses".to_string(),
            vote_consistency: "Consistency in voting patterns".to_string(),
            engagement_depth: "Ratio of thoughtful contributions to simple votes".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaProfile {
    /// Cluster label this persona was built from.
    pub id: usize,
    pub name: String,
    /// Number of participants in the cluster.
    pub size: usize,
    /// Share of all participants, in percent.
    pub percentage: f64,
    pub characteristics: Characteristics,
    pub description: String,
}

/// Outcome of one pipeline run, keyed by cluster label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisResult {
    pub personas: BTreeMap<usize, PersonaProfile>,
    pub feature_importance: FeatureGlossary,
    pub total_participants: usize,
}

impl AnalysisResult {
    /// A result with no personas, produced when no participant survives loading.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characteristics_serialize_in_feature_order() {
        let c = Characteristics::from_vector([0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
        let json = serde_json::to_string(&c).unwrap();
        let mut last = 0;
        for name in FEATURE_NAMES {
            let pos = json.find(name).expect("feature present");
            assert!(pos >= last, "{name} out of order in {json}");
            last = pos;
        }
    }

    #[test]
    fn glossary_covers_every_feature() {
        let json = serde_json::to_value(FeatureGlossary::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), FEATURE_NAMES.len());
        for name in FEATURE_NAMES {
            assert!(obj.contains_key(name), "missing {name}");
        }
    }

    #[test]
    fn named_pairs_follow_vector() {
        let c = Characteristics::from_vector([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let pairs: Vec<_> = c.named().collect();
        assert_eq!(pairs[0], ("consensus_alignment", 1.0));
        assert_eq!(pairs[5], ("engagement_depth", 6.0));
    }

    #[test]
    fn empty_result_has_no_personas() {
        let result = AnalysisResult::empty();
        assert!(result.personas.is_empty());
        assert_eq!(result.total_participants, 0);
    }
}
