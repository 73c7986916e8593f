//! Persona profiles from cluster assignments.
//!
//! The archetype names and trait thresholds below decide the text human
//! reviewers read. They are fixed values, not tuning knobs.

use std::collections::BTreeMap;

use personas_core::{
    AnalysisResult, Characteristics, FeatureGlossary, ParticipantFeatures, PersonaProfile,
};

use crate::error::AnalysisError;

/// Persona names by cluster label. Labels past the end are named
/// `"Persona {label}"`.
pub const ARCHETYPE_NAMES: [&str; 5] = [
    "The Optimistic Architect",
    "The Cautious Skeptic",
    "The Balanced Moderator",
    "The Deep Thinker",
    "The Pragmatic Realist",
];

pub const CONSENSUS_HIGH: f64 = 0.7;
pub const CONSENSUS_LOW: f64 = 0.3;
pub const SENTIMENT_HIGH: f64 = 0.2;
pub const SENTIMENT_LOW: f64 = -0.2;
pub const ENGAGEMENT_HIGH: f64 = 0.5;
pub const ENGAGEMENT_LOW: f64 = 0.2;
pub const PARTICIPATION_HIGH: f64 = 0.8;
pub const PARTICIPATION_LOW: f64 = 0.4;

#[must_use]
pub fn persona_name(label: usize) -> String {
    ARCHETYPE_NAMES
        .get(label)
        .map_or_else(|| format!("Persona {label}"), |name| (*name).to_string())
}

fn trait_phrase(value: f64, high: f64, low: f64, phrases: [&'static str; 3]) -> &'static str {
    let [above, below, between] = phrases;
    if value > high {
        above
    } else if value < low {
        below
    } else {
        between
    }
}

/// Describe a persona from its mean characteristics.
///
/// Four independent traits (consensus, sentiment, engagement, participation)
/// are each picked by threshold and joined into one sentence.
#[must_use]
pub fn describe(c: &Characteristics) -> String {
    let traits = [
        trait_phrase(
            c.consensus_alignment,
            CONSENSUS_HIGH,
            CONSENSUS_LOW,
            [
                "tends to agree with majority opinions",
                "often dissents from popular views",
                "maintains balanced perspective on issues",
            ],
        ),
        trait_phrase(
            c.avg_sentiment,
            SENTIMENT_HIGH,
            SENTIMENT_LOW,
            [
                "expresses optimistic viewpoints",
                "takes cautious or critical stances",
                "maintains neutral emotional tone",
            ],
        ),
        trait_phrase(
            c.engagement_depth,
            ENGAGEMENT_HIGH,
            ENGAGEMENT_LOW,
            [
                "contributes detailed thoughts and analysis",
                "prefers concise interactions",
                "balances brevity with depth",
            ],
        ),
        trait_phrase(
            c.participation_level,
            PARTICIPATION_HIGH,
            PARTICIPATION_LOW,
            [
                "highly active in discussions",
                "selective in participation",
                "moderately engaged",
            ],
        ),
    ];
    format!("This persona {}.", traits.join(", "))
}

/// Build one profile per cluster label.
///
/// `labels[i]` is the cluster of `features[i]`. Characteristics are cluster
/// means in original feature units.
///
/// # Errors
///
/// Returns [`AnalysisError::LabelMismatch`] if `labels` and `features`
/// differ in length.
#[allow(clippy::cast_precision_loss)]
pub fn build_profiles(
    features: &[ParticipantFeatures],
    labels: &[usize],
) -> Result<AnalysisResult, AnalysisError> {
    if features.len() != labels.len() {
        return Err(AnalysisError::LabelMismatch {
            participants: features.len(),
            labels: labels.len(),
        });
    }

    let total = features.len();
    let mut members: BTreeMap<usize, Vec<&ParticipantFeatures>> = BTreeMap::new();
    for (f, &label) in features.iter().zip(labels) {
        members.entry(label).or_default().push(f);
    }

    let personas = members
        .into_iter()
        .map(|(label, group)| {
            let size = group.len();
            let mut sums = [0.0; 6];
            for f in &group {
                for (s, v) in sums.iter_mut().zip(f.vector()) {
                    *s += v;
                }
            }
            let characteristics = Characteristics::from_vector(sums.map(|s| s / size as f64));

            let profile = PersonaProfile {
                id: label,
                name: persona_name(label),
                size,
                percentage: size as f64 / total as f64 * 100.0,
                description: describe(&characteristics),
                characteristics,
            };
            (label, profile)
        })
        .collect();

    Ok(AnalysisResult {
        personas,
        feature_importance: FeatureGlossary::default(),
        total_participants: total,
    })
}
