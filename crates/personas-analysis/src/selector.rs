//! Cluster-count selection by silhouette score.

use std::ops::RangeInclusive;

use crate::error::AnalysisError;
use crate::kmeans::{self, squared_distance, KMeansFit, KMeansParams};

/// Candidate cluster counts. The upper bound shrinks to the participant
/// count when there are fewer than eight participants.
pub const CANDIDATE_K: RangeInclusive<usize> = 2..=8;

/// Seed and restart policy shared by selection and the final fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusteringOptions {
    pub seed: u64,
    pub n_init: usize,
    pub max_iter: usize,
}

impl Default for ClusteringOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            n_init: 10,
            max_iter: 300,
        }
    }
}

impl ClusteringOptions {
    #[must_use]
    pub fn params(&self, k: usize) -> KMeansParams {
        KMeansParams {
            n_init: self.n_init,
            max_iter: self.max_iter,
            ..KMeansParams::new(k, self.seed)
        }
    }
}

/// Chosen cluster count and the silhouette score of every candidate tried.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub k: usize,
    pub scores: Vec<(usize, f64)>,
}

/// Mean silhouette coefficient over all points, in `[-1.0, 1.0]`.
///
/// A point alone in its cluster scores 0. Returns 0 when fewer than two
/// clusters are present.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn silhouette_score<const D: usize>(points: &[[f64; D]], labels: &[usize]) -> f64 {
    let n = points.len();
    let k = labels.iter().max().map_or(0, |&m| m + 1);
    if n < 2 || labels.len() != n || k < 2 {
        return 0.0;
    }

    let mut sizes = vec![0_usize; k];
    for &l in labels {
        sizes[l] += 1;
    }
    if sizes.iter().filter(|&&s| s > 0).count() < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    let mut dist_sums = vec![0.0; k];
    for i in 0..n {
        let own = labels[i];
        if sizes[own] < 2 {
            continue;
        }

        dist_sums.iter_mut().for_each(|s| *s = 0.0);
        for j in 0..n {
            if i != j {
                dist_sums[labels[j]] += squared_distance(&points[i], &points[j]).sqrt();
            }
        }

        let a = dist_sums[own] / (sizes[own] - 1) as f64;
        let b = (0..k)
            .filter(|&c| c != own && sizes[c] > 0)
            .map(|c| dist_sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);

        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }

    total / n as f64
}

/// Pick the cluster count with the highest silhouette score.
///
/// Candidates run from 2 to `min(8, n)`. Ties keep the smaller k.
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientData`] with fewer than two points.
pub fn select_k<const D: usize>(
    points: &[[f64; D]],
    options: &ClusteringOptions,
) -> Result<Selection, AnalysisError> {
    let min_k = *CANDIDATE_K.start();
    if points.len() < min_k {
        return Err(AnalysisError::InsufficientData {
            participants: points.len(),
            min_clusters: min_k,
        });
    }

    let max_k = (*CANDIDATE_K.end()).min(points.len());
    let mut scores = Vec::with_capacity(max_k - min_k + 1);
    let mut best: Option<(usize, f64)> = None;

    for k in min_k..=max_k {
        let KMeansFit { labels, .. } = kmeans::fit(points, &options.params(k))?;
        let score = silhouette_score(points, &labels);
        tracing::info!(k, score, "evaluated cluster count");
        scores.push((k, score));
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((k, score));
        }
    }

    let k = best.map_or(min_k, |(k, _)| k);
    tracing::info!(k, "selected cluster count");
    Ok(Selection { k, scores })
}
