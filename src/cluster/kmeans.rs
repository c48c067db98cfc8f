//! K-means partitioning with k-means++ seeding
//!
//! Distances are haversine meters; centroids are updated as the arithmetic
//! mean of member coordinates, the same approximation used by the other
//! strategies.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::distance::distance_deg;
use super::error::ClusterError;
use super::point::{Cluster, Coordinate, Point, validate_points};

/// Centroid movement, in degrees on each axis, below which iteration stops
pub const CONVERGENCE_DEG: f64 = 0.0001;

/// K-means parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KMeansParams {
    /// Requested number of clusters, clamped to the number of points
    pub k: usize,
    /// Upper bound on refinement iterations
    pub max_iterations: usize,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            k: 8,
            max_iterations: 100,
        }
    }
}

impl KMeansParams {
    pub fn validate(&self) -> Result<(), ClusterError> {
        if self.k == 0 {
            return Err(ClusterError::InvalidK(self.k));
        }
        Ok(())
    }
}

/// Same as [`k_means`], seeding k-means++ from a fixed `seed`
pub fn k_means_seeded<P>(
    points: &[Point<P>],
    k: usize,
    max_iterations: usize,
    seed: u64,
) -> Result<Vec<Cluster<'_, P>>, ClusterError> {
    let mut rng = StdRng::seed_from_u64(seed);
    k_means(points, k, max_iterations, &mut rng)
}

/// Partitions points into at most `k` clusters
///
/// Every point ends up in exactly one cluster. When `k` exceeds the number of
/// points it is clamped, so each point becomes its own cluster. Clusters
/// left without members after the final assignment are omitted.
///
/// Iteration stops early once no centroid moves by [`CONVERGENCE_DEG`] or
/// more on either axis. Membership is always recomputed against the final
/// centroids, and each output center is the mean of its final members.
pub fn k_means<'a, P, R>(
    points: &'a [Point<P>],
    k: usize,
    max_iterations: usize,
    rng: &mut R,
) -> Result<Vec<Cluster<'a, P>>, ClusterError>
where
    R: Rng + ?Sized,
{
    KMeansParams { k, max_iterations }.validate()?;
    validate_points(points)?;

    if points.is_empty() {
        return Ok(Vec::new());
    }

    let k = if k > points.len() {
        tracing::debug!(requested = k, points = points.len(), "clamping k to point count");
        points.len()
    } else {
        k
    };

    let mut centroids = kmeans_plus_plus(points, k, rng);
    let mut assignments = vec![0usize; points.len()];
    let mut iterations = 0;

    while iterations < max_iterations {
        iterations += 1;
        assign(points, &centroids, &mut assignments);

        let updated = update_centroids(points, &assignments, &centroids);
        let max_shift = centroid_shift(&centroids, &updated);
        centroids = updated;

        tracing::trace!(iteration = iterations, max_shift, "k-means iteration");

        if max_shift < CONVERGENCE_DEG {
            tracing::debug!(iterations, "k-means converged");
            break;
        }
    }

    assign(points, &centroids, &mut assignments);

    let mut groups: Vec<Vec<&'a Point<P>>> = vec![Vec::new(); k];
    for (pt, &c) in points.iter().zip(&assignments) {
        groups[c].push(pt);
    }

    let clusters: Vec<_> = groups
        .into_iter()
        .filter(|members| !members.is_empty())
        .enumerate()
        .map(|(id, members)| Cluster::from_members(id, members))
        .collect();

    tracing::debug!(
        points = points.len(),
        k,
        iterations,
        clusters = clusters.len(),
        "k-means done"
    );

    Ok(clusters)
}

/// Picks `k` initial centroids with k-means++
///
/// The first centroid is drawn uniformly. Each following one is drawn with
/// probability proportional to the squared distance to its nearest chosen
/// centroid, by cumulative-sum sampling. Points already chosen have zero
/// weight and cannot be drawn twice. If every weight is zero (all remaining
/// points coincide with centroids) the draw falls back to uniform.
///
/// `points` must be non-empty and `k <= points.len()`.
pub fn kmeans_plus_plus<P, R>(points: &[Point<P>], k: usize, rng: &mut R) -> Vec<Coordinate>
where
    R: Rng + ?Sized,
{
    let mut centroids = Vec::with_capacity(k);
    if points.is_empty() || k == 0 {
        return centroids;
    }

    let first = rng.gen_range(0..points.len());
    centroids.push(points[first].coordinate());

    // Squared distance from each point to its nearest centroid so far
    let mut weights = vec![f64::INFINITY; points.len()];

    while centroids.len() < k {
        let last = centroids[centroids.len() - 1];
        for (w, pt) in weights.iter_mut().zip(points) {
            let d = distance_deg(pt.latitude, pt.longitude, last.latitude, last.longitude);
            *w = w.min(d * d);
        }

        let total: f64 = weights.iter().sum();
        let next = if total > 0.0 && total.is_finite() {
            let target = rng.r#gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut chosen = None;
            for (i, &w) in weights.iter().enumerate() {
                cumulative += w;
                if target < cumulative {
                    chosen = Some(i);
                    break;
                }
            }
            // Rounding can leave target at the very end of the range
            chosen.unwrap_or_else(|| weights.iter().rposition(|&w| w > 0.0).unwrap_or(0))
        } else {
            rng.gen_range(0..points.len())
        };

        centroids.push(points[next].coordinate());
    }

    centroids
}

/// Assigns every point to its nearest centroid, first index wins ties
fn assign<P>(points: &[Point<P>], centroids: &[Coordinate], assignments: &mut [usize]) {
    for (pt, slot) in points.iter().zip(assignments.iter_mut()) {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (c, centroid) in centroids.iter().enumerate() {
            let d = distance_deg(pt.latitude, pt.longitude, centroid.latitude, centroid.longitude);
            if d < best_dist {
                best = c;
                best_dist = d;
            }
        }
        *slot = best;
    }
}

/// Largest per-axis movement, in degrees, between two centroid sets
pub(crate) fn centroid_shift(old: &[Coordinate], new: &[Coordinate]) -> f64 {
    old.iter()
        .zip(new)
        .map(|(o, n)| {
            (o.latitude - n.latitude)
                .abs()
                .max((o.longitude - n.longitude).abs())
        })
        .fold(0.0, f64::max)
}

/// Mean of assigned points per centroid; a centroid with no points stays put
pub(crate) fn update_centroids<P>(
    points: &[Point<P>],
    assignments: &[usize],
    previous: &[Coordinate],
) -> Vec<Coordinate> {
    let mut sums = vec![Coordinate::default(); previous.len()];
    let mut counts = vec![0usize; previous.len()];

    for (pt, &c) in points.iter().zip(assignments) {
        sums[c].latitude += pt.latitude;
        sums[c].longitude += pt.longitude;
        counts[c] += 1;
    }

    sums.into_iter()
        .zip(counts)
        .zip(previous)
        .map(|((sum, count), prev)| {
            if count == 0 {
                *prev
            } else {
                Coordinate::new(sum.latitude / count as f64, sum.longitude / count as f64)
            }
        })
        .collect()
}
