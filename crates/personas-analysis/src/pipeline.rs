//! Pipeline orchestration: load → features → standardize → select k →
//! cluster → profile.
//!
//! Every stage takes the previous stage's output and returns a new value;
//! nothing is shared between runs.

use std::path::PathBuf;

use personas_core::{AnalysisResult, AppConfig, ParticipantFeatures};

use crate::error::AnalysisError;
use crate::features::engineer_features;
use crate::kmeans;
use crate::loader::{load_rounds, RoundDataset};
use crate::profiler::build_profiles;
use crate::scaling::standardize;
use crate::selector::{select_k, ClusteringOptions, Selection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub data_dir: PathBuf,
    pub rounds: Vec<u32>,
    pub clustering: ClusteringOptions,
}

impl PipelineOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            rounds: config.rounds.clone(),
            clustering: ClusteringOptions {
                seed: config.seed,
                n_init: config.n_init,
                max_iter: config.max_iter,
            },
        }
    }
}

/// Output of one run: the exportable result plus diagnostics that are
/// logged but not exported.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRun {
    pub result: AnalysisResult,
    /// `None` when there were no participants to cluster.
    pub selection: Option<Selection>,
    /// Rounds that loaded successfully, in load order.
    pub rounds_loaded: Vec<u32>,
}

/// Cluster assignment for a set of participants.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    pub selection: Selection,
    /// `labels[i]` is the cluster of participant `i`, in `0..selection.k`.
    pub labels: Vec<usize>,
}

/// Standardize the feature vectors, choose k, and fit the final clustering.
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientData`] with fewer than two participants.
pub fn cluster_participants(
    features: &[ParticipantFeatures],
    options: &ClusteringOptions,
) -> Result<Clustering, AnalysisError> {
    let raw: Vec<[f64; 6]> = features.iter().map(ParticipantFeatures::vector).collect();
    let scaled = standardize(&raw);

    let selection = select_k(&scaled, options)?;
    let fit = kmeans::fit(&scaled, &options.params(selection.k))?;

    Ok(Clustering {
        selection,
        labels: fit.labels,
    })
}

/// Run everything after loading.
///
/// Zero participants yield an empty result rather than an error.
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientData`] when exactly one participant
/// has features.
pub fn analyze_rounds(
    rounds: &[RoundDataset],
    options: &ClusteringOptions,
) -> Result<AnalysisRun, AnalysisError> {
    let rounds_loaded = rounds.iter().map(|r| r.round_id).collect();

    let features = engineer_features(rounds);
    tracing::info!(participants = features.len(), "engineered participant features");

    if features.is_empty() {
        tracing::warn!("no participants found; producing an empty result");
        return Ok(AnalysisRun {
            result: AnalysisResult::empty(),
            selection: None,
            rounds_loaded,
        });
    }

    let Clustering { selection, labels } = cluster_participants(&features, options)?;
    let result = build_profiles(&features, &labels)?;
    tracing::info!(
        k = selection.k,
        personas = result.personas.len(),
        "built persona profiles"
    );

    Ok(AnalysisRun {
        result,
        selection: Some(selection),
        rounds_loaded,
    })
}

/// Load the configured rounds and run the full analysis.
///
/// Rounds that fail to load are logged and skipped.
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientData`] when exactly one participant
/// has features.
pub fn run_analysis(options: &PipelineOptions) -> Result<AnalysisRun, AnalysisError> {
    let rounds = load_rounds(&options.data_dir, &options.rounds);
    if rounds.is_empty() {
        tracing::warn!(
            data_dir = %options.data_dir.display(),
            requested = ?options.rounds,
            "no rounds loaded"
        );
    }
    analyze_rounds(&rounds, &options.clustering)
}
