use thiserror::Error;

/// Precondition failures reported by the clustering functions
///
/// The algorithms themselves are total over valid input; every variant here
/// is raised before any clustering work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusterError {
    #[error("point {index} has a non-finite coordinate (latitude={latitude}, longitude={longitude})")]
    NonFiniteCoordinate {
        index: usize,
        latitude: f64,
        longitude: f64,
    },

    #[error("epsilon must be a finite, non-negative distance in meters, got {0}")]
    InvalidEpsilon(f64),

    #[error("min_points must be >= 1, got {0}")]
    InvalidMinPoints(usize),

    #[error("k must be >= 1, got {0}")]
    InvalidK(usize),

    #[error("cell size must be a finite, positive number of degrees, got {0}")]
    InvalidCellSize(f64),

    #[error("min_cluster_size must be >= 1, got {0}")]
    InvalidMinClusterSize(usize),
}
