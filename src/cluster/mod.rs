//! Package cluster implements clustering of geographic (lat, lon) points
//! for hotspot maps: DBSCAN, k-means, grid binning, region aggregation and
//! multi-resolution DBSCAN, all over haversine distance.
pub mod dbscan;
pub mod distance;
pub mod error;
pub mod grid;
pub mod kmeans;
pub mod multi_resolution;
pub mod point;
pub mod region;

#[cfg(test)]
mod kmeans_test;

pub use dbscan::{
    DEFAULT_EPSILON_M, DEFAULT_MIN_POINTS, DbscanParams, dbscan, dbscan_with_noise, region_query,
};
pub use distance::{DEGREE_RAD, EARTH_RADIUS_M, distance, distance_deg};
pub use error::ClusterError;
pub use grid::{DEFAULT_CELL_SIZE_DEG, grid_bin};
pub use kmeans::{CONVERGENCE_DEG, KMeansParams, k_means, k_means_seeded, kmeans_plus_plus};
pub use multi_resolution::{DEFAULT_MIN_CLUSTER_SIZE, EPSILON_LADDER_M, multi_resolution_cluster};
pub use point::{Cluster, Coordinate, Point, PointList, centroid, validate_points};
pub use region::region_aggregate;
