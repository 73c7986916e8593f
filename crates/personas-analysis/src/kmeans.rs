//! Seeded Euclidean k-means.
//!
//! k-means++ seeding followed by Lloyd iterations, repeated `n_init` times
//! from a single [`StdRng`] seeded with the caller's seed. The restart with
//! the lowest inertia wins, so identical input and parameters always give
//! identical labels.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::AnalysisError;

/// Total squared centroid movement below which Lloyd iterations stop.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansParams {
    pub k: usize,
    pub seed: u64,
    pub n_init: usize,
    pub max_iter: usize,
    pub tolerance: f64,
}

impl KMeansParams {
    #[must_use]
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            seed,
            n_init: 10,
            max_iter: 300,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit<const D: usize> {
    /// One label per input point; every label in `0..k` is used.
    pub labels: Vec<usize>,
    pub centroids: Vec<[f64; D]>,
    /// Sum of squared distances from each point to its centroid.
    pub inertia: f64,
}

pub(crate) fn squared_distance<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Partition `points` into `params.k` clusters.
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientData`] if `k` is zero or there are
/// fewer points than clusters.
pub fn fit<const D: usize>(
    points: &[[f64; D]],
    params: &KMeansParams,
) -> Result<KMeansFit<D>, AnalysisError> {
    if params.k == 0 || points.len() < params.k {
        return Err(AnalysisError::InsufficientData {
            participants: points.len(),
            min_clusters: params.k.max(1),
        });
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut best = fit_once(points, params, &mut rng);

    for _ in 1..params.n_init {
        let candidate = fit_once(points, params, &mut rng);
        if candidate.inertia < best.inertia {
            best = candidate;
        }
    }

    Ok(best)
}

fn fit_once<const D: usize>(
    points: &[[f64; D]],
    params: &KMeansParams,
    rng: &mut StdRng,
) -> KMeansFit<D> {
    let mut centroids = init_plus_plus(points, params.k, rng);
    let mut labels = vec![0; points.len()];

    for _ in 0..params.max_iter {
        assign(points, &centroids, &mut labels);
        let updated = recompute(points, &labels, &centroids);
        let shift: f64 = centroids
            .iter()
            .zip(&updated)
            .map(|(old, new)| squared_distance(old, new))
            .sum();
        centroids = updated;
        if shift <= params.tolerance {
            break;
        }
    }

    assign(points, &centroids, &mut labels);
    repair_empty_clusters(points, &mut labels, &mut centroids);

    let inertia = points
        .iter()
        .zip(&labels)
        .map(|(p, &l)| squared_distance(p, &centroids[l]))
        .sum();

    KMeansFit {
        labels,
        centroids,
        inertia,
    }
}

/// k-means++ seeding: each next centroid is drawn with probability
/// proportional to its squared distance from the nearest chosen one.
fn init_plus_plus<const D: usize>(
    points: &[[f64; D]],
    k: usize,
    rng: &mut StdRng,
) -> Vec<[f64; D]> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..points.len())]);

    let mut nearest: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = nearest.iter().sum();
        let idx = if total > 0.0 {
            let target = rng.random::<f64>() * total;
            let mut acc = 0.0;
            nearest
                .iter()
                .position(|&d| {
                    acc += d;
                    acc > target
                })
                .unwrap_or_else(|| {
                    // Rounding can leave `acc` just short of `target`.
                    nearest.iter().rposition(|&d| d > 0.0).unwrap_or(0)
                })
        } else {
            rng.random_range(0..points.len())
        };

        let chosen = points[idx];
        for (d, p) in nearest.iter_mut().zip(points) {
            *d = d.min(squared_distance(p, &chosen));
        }
        centroids.push(chosen);
    }

    centroids
}

/// Label each point with its nearest centroid; ties go to the lower label.
fn assign<const D: usize>(points: &[[f64; D]], centroids: &[[f64; D]], labels: &mut [usize]) {
    for (label, p) in labels.iter_mut().zip(points) {
        let mut best = 0;
        let mut best_d = f64::INFINITY;
        for (c, centroid) in centroids.iter().enumerate() {
            let d = squared_distance(p, centroid);
            if d < best_d {
                best = c;
                best_d = d;
            }
        }
        *label = best;
    }
}

/// Mean of each cluster's points. An empty cluster keeps its previous centroid.
#[allow(clippy::cast_precision_loss)]
fn recompute<const D: usize>(
    points: &[[f64; D]],
    labels: &[usize],
    previous: &[[f64; D]],
) -> Vec<[f64; D]> {
    let mut sums = vec![[0.0; D]; previous.len()];
    let mut counts = vec![0_usize; previous.len()];
    for (p, &l) in points.iter().zip(labels) {
        for (s, v) in sums[l].iter_mut().zip(p) {
            *s += v;
        }
        counts[l] += 1;
    }

    sums.iter()
        .zip(&counts)
        .zip(previous)
        .map(|((sum, &count), prev)| {
            if count == 0 {
                *prev
            } else {
                std::array::from_fn(|d| sum[d] / count as f64)
            }
        })
        .collect()
}

/// Give every empty cluster one point, taken from a cluster of two or more:
/// the point farthest from its own centroid.
fn repair_empty_clusters<const D: usize>(
    points: &[[f64; D]],
    labels: &mut [usize],
    centroids: &mut [[f64; D]],
) {
    let k = centroids.len();
    loop {
        let mut counts = vec![0_usize; k];
        for &l in labels.iter() {
            counts[l] += 1;
        }
        let Some(empty) = counts.iter().position(|&c| c == 0) else {
            return;
        };

        let donor = (0..points.len())
            .filter(|&i| counts[labels[i]] >= 2)
            .map(|i| (i, squared_distance(&points[i], &centroids[labels[i]])))
            .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                Some((_, best_d)) if best_d >= d => best,
                _ => Some((i, d)),
            });
        // Unreachable while there are at least as many points as clusters.
        let Some((idx, _)) = donor else {
            return;
        };

        let old = labels[idx];
        labels[idx] = empty;
        centroids[empty] = points[idx];
        let refreshed = recompute(points, labels, centroids)[old];
        centroids[old] = refreshed;
    }
}
