use rand::seq::index;
use rand::Rng;

use crate::error::{AnalysisError, AnalysisResult};

/// Result of a batch K-means run over `D`-dimensional points.
#[derive(Debug, Clone, PartialEq)]
pub struct KmeansResult<const D: usize> {
    /// Cluster index for each input point, in input order.
    pub assignments: Vec<usize>,
    /// Final centroid vectors, indexed by cluster id.
    pub centroids: Vec<[f64; D]>,
    /// Number of clusters.
    pub k: usize,
    /// Number of Lloyd's iterations performed.
    pub iterations: usize,
    /// Sum of squared distances from each point to its assigned centroid.
    pub inertia: f64,
}

impl<const D: usize> KmeansResult<D> {
    /// Number of points assigned to each cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k];
        for &c in &self.assignments {
            sizes[c] += 1;
        }
        sizes
    }
}

/// Run Lloyd's K-means algorithm.
///
/// Initial centroids are `k` distinct input points drawn from `rng`, so the
/// caller controls determinism by choosing the generator. Iterates until
/// assignments stabilize or `max_iterations` is reached.
pub fn kmeans<const D: usize, R: Rng + ?Sized>(
    points: &[[f64; D]],
    k: usize,
    max_iterations: usize,
    rng: &mut R,
) -> AnalysisResult<KmeansResult<D>> {
    let n = points.len();
    if k == 0 || n < k {
        return Err(AnalysisError::InsufficientData { required: k.max(1), actual: n });
    }

    let mut centroids = random_init(points, k, rng);
    let mut assignments = vec![0usize; n];
    let mut iterations = 0;

    for _ in 0..max_iterations {
        iterations += 1;

        // Assignment step: assign each point to nearest centroid.
        let mut changed = false;
        for (i, p) in points.iter().enumerate() {
            let nearest = nearest_centroid(p, &centroids);
            if assignments[i] != nearest {
                assignments[i] = nearest;
                changed = true;
            }
        }

        if !changed && iterations > 1 {
            break;
        }

        // Update step: recompute centroids as mean of assigned points.
        let mut sums = vec![[0.0; D]; k];
        let mut counts = vec![0usize; k];
        for (p, &c) in points.iter().zip(&assignments) {
            counts[c] += 1;
            for (acc, v) in sums[c].iter_mut().zip(p) {
                *acc += v;
            }
        }
        for (c, sum) in sums.iter().enumerate() {
            // Empty cluster: keep previous centroid.
            if counts[c] > 0 {
                let count = counts[c] as f64;
                for (dst, s) in centroids[c].iter_mut().zip(sum) {
                    *dst = s / count;
                }
            }
        }
    }

    let inertia = points
        .iter()
        .zip(&assignments)
        .map(|(p, &c)| squared_euclidean(p, &centroids[c]))
        .sum::<f64>();
    if !inertia.is_finite() {
        return Err(AnalysisError::NonFinite("kmeans"));
    }

    Ok(KmeansResult {
        assignments,
        centroids,
        k,
        iterations,
        inertia,
    })
}

// ── Internal helpers ─────────────────────────────────────────

/// Pick `k` distinct points uniformly at random as the initial centroids.
fn random_init<const D: usize, R: Rng + ?Sized>(
    points: &[[f64; D]],
    k: usize,
    rng: &mut R,
) -> Vec<[f64; D]> {
    index::sample(rng, points.len(), k)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

/// Find the index of the nearest centroid.
fn nearest_centroid<const D: usize>(point: &[f64; D], centroids: &[[f64; D]]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = f64::MAX;
    for (i, centroid) in centroids.iter().enumerate() {
        let dist = squared_euclidean(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best_idx = i;
        }
    }
    best_idx
}

/// Squared Euclidean distance.
#[inline]
fn squared_euclidean<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
