use super::distance::distance;
use super::error::ClusterError;
use super::point::{Cluster, Point, validate_points};
use bitvec::prelude::*;

// DBSCAN algorithm pseudocode (from <http://en.wikipedia.org/wiki/DBSCAN>):
//
// DBSCAN(D, eps, MinPts)
//    C = 0
//    for each unvisited point P in dataset D
//       mark P as visited
//       NeighborPts = regionQuery(P, eps)
//       if sizeof(NeighborPts) < MinPts
//          mark P as NOISE
//       else
//          C = next cluster
//          expandCluster(P, NeighborPts, C, eps, MinPts)
//
// expandCluster(P, NeighborPts, C, eps, MinPts)
//    add P to cluster C
//    for each point P' in NeighborPts
//       if P' is not visited
//          mark P' as visited
//          NeighborPts' = regionQuery(P', eps)
//          if sizeof(NeighborPts') >= MinPts
//             NeighborPts = NeighborPts joined with NeighborPts'
//       if P' is not yet member of any cluster
//          add P' to cluster C
//
// regionQuery(P, eps)
//    return all points within P's eps-neighborhood (including P)

/// Default clustering radius in meters
pub const DEFAULT_EPSILON_M: f64 = 500.0;

/// Default density threshold
pub const DEFAULT_MIN_POINTS: usize = 3;

/// DBSCAN parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DbscanParams {
    /// Clustering radius in meters (inclusive)
    pub epsilon_m: f64,
    /// Minimum number of points in eps-neighbourhood, the point itself included
    pub min_points: usize,
}

impl Default for DbscanParams {
    fn default() -> Self {
        Self {
            epsilon_m: DEFAULT_EPSILON_M,
            min_points: DEFAULT_MIN_POINTS,
        }
    }
}

impl DbscanParams {
    pub fn validate(&self) -> Result<(), ClusterError> {
        if !self.epsilon_m.is_finite() || self.epsilon_m < 0.0 {
            return Err(ClusterError::InvalidEpsilon(self.epsilon_m));
        }
        if self.min_points == 0 {
            return Err(ClusterError::InvalidMinPoints(self.min_points));
        }
        Ok(())
    }
}

/// Clusters incoming points using DBSCAN algorithm
///
/// Noise points are dropped from the output. Use [`dbscan_with_noise`] to
/// get their indices as well.
///
/// # Arguments
///
/// * `points` - List of points to cluster
/// * `epsilon` - Clustering radius in meters
/// * `min_points` - Minimum number of points in eps-neighbourhood (density threshold)
pub fn dbscan<P>(
    points: &[Point<P>],
    epsilon: f64,
    min_points: usize,
) -> Result<Vec<Cluster<'_, P>>, ClusterError> {
    dbscan_with_noise(points, epsilon, min_points).map(|(clusters, _)| clusters)
}

/// Clusters incoming points using DBSCAN algorithm
///
/// Border points reachable from more than one cluster go to whichever
/// cluster's expansion reaches them first, so the result depends on input
/// order. Neighbour queries are brute force, O(N^2) overall.
///
/// # Returns
///
/// A tuple `(clusters, noise)` where:
/// - `clusters` is a vector of found clusters, ids assigned in discovery order
/// - `noise` is a vector of point indices that are outliers (not in any cluster)
pub fn dbscan_with_noise<P>(
    points: &[Point<P>],
    epsilon: f64,
    min_points: usize,
) -> Result<(Vec<Cluster<'_, P>>, Vec<usize>), ClusterError> {
    DbscanParams {
        epsilon_m: epsilon,
        min_points,
    }
    .validate()?;
    validate_points(points)?;

    let mut visited = bitvec![0; points.len()];
    let mut members = bitvec![0; points.len()];
    let mut neighbor_unique = bitvec![0; points.len()];
    let mut clusters = Vec::new();

    for i in 0..points.len() {
        if visited[i] {
            continue;
        }
        visited.set(i, true);

        let neighbor_pts = region_query(points, &points[i], epsilon);
        if neighbor_pts.len() < min_points {
            // Provisional noise, may still be absorbed as a border point
            continue;
        }

        let mut cluster_points = vec![&points[i]];
        members.set(i, true);

        // expandCluster goes here inline
        neighbor_unique.fill(false);
        for &j in &neighbor_pts {
            neighbor_unique.set(j, true);
        }

        let mut neighbor_pts = neighbor_pts;
        let mut j = 0;
        // Use while loop to handle dynamic growth of neighbor_pts during iteration
        while j < neighbor_pts.len() {
            let k = neighbor_pts[j];
            if !visited[k] {
                visited.set(k, true);
                let more_neighbors = region_query(points, &points[k], epsilon);
                if more_neighbors.len() >= min_points {
                    for p in more_neighbors {
                        if !neighbor_unique[p] {
                            neighbor_pts.push(p);
                            neighbor_unique.set(p, true);
                        }
                    }
                }
            }

            if !members[k] {
                cluster_points.push(&points[k]);
                members.set(k, true);
            }
            j += 1;
        }

        clusters.push(Cluster::from_members(clusters.len(), cluster_points));
    }

    let noise: Vec<usize> = members.iter_zeros().collect();

    tracing::debug!(
        points = points.len(),
        epsilon_m = epsilon,
        min_points,
        clusters = clusters.len(),
        noise = noise.len(),
        "dbscan done"
    );

    Ok((clusters, noise))
}

/// Simple O(N) way to find points in neighbourhood
///
/// Returns indices of all points within `eps` meters of `p` (inclusive), in
/// ascending index order. The query point itself is included when it is part
/// of `points`.
pub fn region_query<P, Q>(points: &[Point<P>], p: &Point<Q>, eps: f64) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, point)| distance(*point, p) <= eps)
        .map(|(i, _)| i)
        .collect()
}
