//! Multi-resolution density clustering
//!
//! An HDBSCAN-like approximation: DBSCAN runs at a fixed ladder of shrinking
//! radii and the candidates are de-duplicated greedily, largest first, by a
//! rounded-centroid key. The result is a hotspot estimate, not a true
//! hierarchical partition. Overlapping clusters with different rounded
//! centroids are all kept.

use std::collections::HashSet;

use super::dbscan::dbscan;
use super::error::ClusterError;
use super::point::{Cluster, Coordinate, Point, validate_points};

/// DBSCAN radii tried, in meters, coarsest first
pub const EPSILON_LADDER_M: [f64; 4] = [1000.0, 750.0, 500.0, 250.0];

/// Default minimum cluster size
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 3;

/// Decimal places kept in identity keys (~11 m)
const KEY_SCALE: f64 = 1e4;

type CoordKey = (i64, i64);

/// Clusters points at several DBSCAN radii and keeps one cluster per hotspot
///
/// Every pass uses `min_points = min_cluster_size`. Candidates are visited in
/// descending `count`; a candidate is accepted unless its centroid, rounded to
/// 4 decimal degrees, was already claimed by an accepted cluster (its own
/// centroid or one of its members' rounded coordinates). Rejected candidates
/// are dropped whole. Accepted clusters are renumbered from 0.
pub fn multi_resolution_cluster<P>(
    points: &[Point<P>],
    min_cluster_size: usize,
) -> Result<Vec<Cluster<'_, P>>, ClusterError> {
    if min_cluster_size == 0 {
        return Err(ClusterError::InvalidMinClusterSize(min_cluster_size));
    }
    validate_points(points)?;

    let mut candidates = Vec::new();
    for &epsilon in &EPSILON_LADDER_M {
        let found = dbscan(points, epsilon, min_cluster_size)?;
        tracing::trace!(epsilon_m = epsilon, clusters = found.len(), "multi-resolution pass");
        candidates.extend(found);
    }
    let candidate_count = candidates.len();

    // Stable: equal counts keep ladder order, coarsest radius first
    candidates.sort_by(|a, b| b.count.cmp(&a.count));

    let mut claimed: HashSet<CoordKey> = HashSet::new();
    let mut accepted = Vec::new();

    for candidate in candidates {
        let key = coord_key(candidate.center);
        if claimed.contains(&key) {
            continue;
        }

        claimed.insert(key);
        claimed.extend(candidate.members.iter().map(|pt| coord_key(pt.coordinate())));
        accepted.push(Cluster {
            id: accepted.len(),
            ..candidate
        });
    }

    tracing::debug!(
        points = points.len(),
        min_cluster_size,
        candidates = candidate_count,
        clusters = accepted.len(),
        "multi-resolution clustering done"
    );

    Ok(accepted)
}

fn coord_key(c: Coordinate) -> CoordKey {
    (
        (c.latitude * KEY_SCALE).round() as i64,
        (c.longitude * KEY_SCALE).round() as i64,
    )
}
