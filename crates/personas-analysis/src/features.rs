//! Per-participant feature engineering.
//!
//! Records from all loaded rounds are merged per participant. Only
//! participants that appear in a vote table get a feature vector; texts from
//! anyone else are ignored.

use std::collections::HashMap;

use personas_core::{ParticipantFeatures, TextRecord, VoteRecord, FEATURE_NAMES};

use crate::error::FeatureError;
use crate::loader::RoundDataset;
use crate::sentiment::polarity;

/// Divisor that maps interaction counts and word counts onto [0, 1].
pub const SATURATION_SCALE: f64 = 100.0;

/// `consensus_alignment` for a participant with no votes.
pub const NEUTRAL_ALIGNMENT: f64 = 0.5;

/// A participant's raw records across rounds, in load order.
#[derive(Debug, Default)]
struct ParticipantRecords<'a> {
    votes: Vec<&'a VoteRecord>,
    texts: Vec<&'a TextRecord>,
}

/// Derive one feature vector per participant found in any vote table.
///
/// Participants are returned in order of first appearance. A participant
/// whose features cannot be computed is logged and left out.
#[must_use]
pub fn engineer_features(rounds: &[RoundDataset]) -> Vec<ParticipantFeatures> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_participant: HashMap<&str, ParticipantRecords<'_>> = HashMap::new();

    for vote in rounds.iter().flat_map(|r| &r.votes) {
        let id = vote.participant_id.as_str();
        by_participant
            .entry(id)
            .or_insert_with(|| {
                order.push(id);
                ParticipantRecords::default()
            })
            .votes
            .push(vote);
    }

    for text in rounds.iter().flat_map(|r| &r.texts) {
        if let Some(records) = by_participant.get_mut(text.participant_id.as_str()) {
            records.texts.push(text);
        }
    }

    let mut features = Vec::with_capacity(order.len());
    for id in order {
        let records = &by_participant[id];
        match participant_features(id, &records.votes, &records.texts) {
            Ok(f) => features.push(f),
            Err(e) => {
                tracing::warn!(participant = id, error = %e, "skipping participant");
            }
        }
    }

    tracing::debug!(participants = features.len(), "engineered features");
    features
}

/// Compute the feature vector for one participant.
///
/// # Errors
///
/// Returns [`FeatureError::EmptyParticipantId`] for a blank id and
/// [`FeatureError::InvalidValue`] if any feature comes out non-finite.
#[allow(clippy::cast_precision_loss)]
pub fn participant_features(
    participant_id: &str,
    votes: &[&VoteRecord],
    texts: &[&TextRecord],
) -> Result<ParticipantFeatures, FeatureError> {
    if participant_id.trim().is_empty() {
        return Err(FeatureError::EmptyParticipantId);
    }

    let total_votes = votes.len();
    let agree_votes = votes.iter().filter(|v| v.vote.is_agree()).count();
    let text_contributions = texts.len();

    let consensus_alignment = if total_votes > 0 {
        agree_votes as f64 / total_votes as f64
    } else {
        NEUTRAL_ALIGNMENT
    };

    let participation_level =
        saturate((total_votes + text_contributions) as f64 / SATURATION_SCALE);

    let usable: Vec<&str> = texts.iter().filter_map(|t| t.usable_text()).collect();
    let avg_sentiment = mean(usable.iter().map(|t| polarity(t))).unwrap_or(0.0);
    let avg_words = mean(usable.iter().map(|t| t.split_whitespace().count() as f64));
    let avg_text_length = avg_words.map_or(0.0, |w| saturate(w / SATURATION_SCALE));

    let vote_consistency = if total_votes < 2 {
        1.0
    } else {
        1.0 - population_std(votes.iter().map(|v| if v.vote.is_agree() { 1.0 } else { 0.0 }))
    };

    let engagement_depth = if total_votes > 0 {
        text_contributions as f64 / total_votes as f64
    } else {
        0.0
    };

    let features = ParticipantFeatures {
        participant_id: participant_id.to_string(),
        consensus_alignment,
        participation_level,
        avg_sentiment,
        avg_text_length,
        vote_consistency,
        engagement_depth,
        text_contributions,
    };

    if let Some((feature, value)) = FEATURE_NAMES
        .into_iter()
        .zip(features.vector())
        .find(|(_, v)| !v.is_finite())
    {
        return Err(FeatureError::InvalidValue {
            participant: participant_id.to_string(),
            feature,
            value,
        });
    }

    Ok(features)
}

fn saturate(x: f64) -> f64 {
    x.min(1.0)
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0_usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn population_std(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let Some(mu) = mean(values.clone()) else {
        return 0.0;
    };
    mean(values.map(|v| (v - mu).powi(2))).map_or(0.0, f64::sqrt)
}

#[cfg(test)]
mod tests {
    use personas_core::Vote;

    use super::*;

    fn vote(id: &str, raw: &str, round_id: u32) -> VoteRecord {
        VoteRecord {
            participant_id: id.to_string(),
            vote: Vote::from(raw),
            round_id,
        }
    }

    fn text(id: &str, body: Option<&str>, round_id: u32) -> TextRecord {
        TextRecord {
            participant_id: id.to_string(),
            text: body.map(str::to_string),
            round_id,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn worked_example_matches_hand_computation() {
        let votes = [vote("p1", "Agree", 1), vote("p1", "Agree", 1), vote("p1", "Disagree", 1)];
        let texts = [text("p1", Some("I love this"), 1), text("p1", Some("no comment"), 1)];
        let vote_refs: Vec<&VoteRecord> = votes.iter().collect();
        let text_refs: Vec<&TextRecord> = texts.iter().collect();

        let f = participant_features("p1", &vote_refs, &text_refs).unwrap();

        assert_close(f.consensus_alignment, 2.0 / 3.0);
        assert_close(f.vote_consistency, 1.0 - (2.0_f64 / 9.0).sqrt());
        assert_close(f.avg_sentiment, (polarity("I love this") + polarity("no comment")) / 2.0);
        assert_close(f.participation_level, 5.0 / 100.0);
        assert_close(f.avg_text_length, 2.5 / 100.0);
        assert_close(f.engagement_depth, 2.0 / 3.0);
        assert_eq!(f.text_contributions, 2);
    }

    #[test]
    fn zero_votes_defaults() {
        let texts = [text("p1", Some("hello there"), 1)];
        let text_refs: Vec<&TextRecord> = texts.iter().collect();
        let f = participant_features("p1", &[], &text_refs).unwrap();
        assert_eq!(f.consensus_alignment, 0.5);
        assert_eq!(f.vote_consistency, 1.0);
        assert_eq!(f.engagement_depth, 0.0);
    }

    #[test]
    fn single_vote_is_fully_consistent() {
        let votes = [vote("p1", "Disagree", 1)];
        let vote_refs: Vec<&VoteRecord> = votes.iter().collect();
        let f = participant_features("p1", &vote_refs, &[]).unwrap();
        assert_eq!(f.vote_consistency, 1.0);
        assert_eq!(f.consensus_alignment, 0.0);
    }

    #[test]
    fn no_usable_text_zeroes_text_features() {
        let votes = [vote("p1", "Agree", 1)];
        let texts = [text("p1", None, 1), text("p1", Some("   "), 1)];
        let vote_refs: Vec<&VoteRecord> = votes.iter().collect();
        let text_refs: Vec<&TextRecord> = texts.iter().collect();
        let f = participant_features("p1", &vote_refs, &text_refs).unwrap();
        assert_eq!(f.avg_sentiment, 0.0);
        assert_eq!(f.avg_text_length, 0.0);
        // Blank contributions still count as contributions.
        assert_eq!(f.text_contributions, 2);
        assert_close(f.engagement_depth, 2.0);
    }

    #[test]
    fn participation_saturates_at_one() {
        let votes: Vec<VoteRecord> = (0..10_000).map(|_| vote("p1", "Agree", 1)).collect();
        let vote_refs: Vec<&VoteRecord> = votes.iter().collect();
        let f = participant_features("p1", &vote_refs, &[]).unwrap();
        assert_eq!(f.participation_level, 1.0);
        assert_eq!(f.vote_consistency, 1.0);
    }

    #[test]
    fn text_length_saturates_at_one() {
        let long = "word ".repeat(500);
        let votes = [vote("p1", "Agree", 1)];
        let texts = [text("p1", Some(&long), 1)];
        let vote_refs: Vec<&VoteRecord> = votes.iter().collect();
        let text_refs: Vec<&TextRecord> = texts.iter().collect();
        let f = participant_features("p1", &vote_refs, &text_refs).unwrap();
        assert_eq!(f.avg_text_length, 1.0);
    }

    #[test]
    fn other_votes_count_as_non_agree() {
        let votes = [vote("p1", "Agree", 1), vote("p1", "Pass", 1)];
        let vote_refs: Vec<&VoteRecord> = votes.iter().collect();
        let f = participant_features("p1", &vote_refs, &[]).unwrap();
        assert_close(f.consensus_alignment, 0.5);
        assert_close(f.vote_consistency, 0.5);
    }

    #[test]
    fn blank_participant_id_is_rejected() {
        let err = participant_features("  ", &[], &[]).unwrap_err();
        assert!(matches!(err, FeatureError::EmptyParticipantId));
    }

    #[test]
    fn engineer_features_merges_rounds_in_first_appearance_order() {
        let rounds = vec![
            RoundDataset {
                round_id: 1,
                votes: vec![vote("b", "Agree", 1), vote("a", "Disagree", 1)],
                texts: vec![text("a", Some("great idea"), 1), text("ghost", Some("hi"), 1)],
                ..RoundDataset::default()
            },
            RoundDataset {
                round_id: 3,
                votes: vec![vote("a", "Agree", 3), vote("c", "Agree", 3)],
                ..RoundDataset::default()
            },
        ];

        let features = engineer_features(&rounds);
        let ids: Vec<&str> = features.iter().map(|f| f.participant_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);

        let a = &features[1];
        assert_close(a.consensus_alignment, 0.5);
        assert_eq!(a.text_contributions, 1);
    }

    #[test]
    fn engineer_features_skips_blank_ids() {
        let rounds = vec![RoundDataset {
            round_id: 1,
            votes: vec![vote("", "Agree", 1), vote("p1", "Agree", 1)],
            ..RoundDataset::default()
        }];
        let features = engineer_features(&rounds);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].participant_id, "p1");
    }

    #[test]
    fn engineer_features_on_no_rounds_is_empty() {
        assert!(engineer_features(&[]).is_empty());
    }
}
