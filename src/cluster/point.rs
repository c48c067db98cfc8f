//! Point and cluster types shared by every clustering strategy

use super::error::ClusterError;

/// Coordinate is a bare (latitude, longitude) pair in degrees
///
/// Used for cluster centers, which are computed and need not coincide with
/// any input point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Point is a geographic location carrying an opaque payload
///
/// Latitude is expected in `[-90, 90]` and longitude in `[-180, 180]`, but
/// the range is not enforced. Only non-finite values are rejected by the
/// clustering functions.
#[derive(Debug, Clone, PartialEq)]
pub struct Point<P = ()> {
    pub latitude: f64,
    pub longitude: f64,
    pub payload: P,
}

/// PointList is a collection of Points
pub type PointList<P = ()> = Vec<Point<P>>;

/// Cluster represents one group produced by a clustering call
///
/// Members borrow from the input slice the cluster was built from and are
/// kept in discovery order.
#[derive(Debug, Clone)]
pub struct Cluster<'a, P = ()> {
    /// Cluster ID, unique and 0-based within one call's output
    pub id: usize,
    /// Center of the cluster (not necessarily an input point)
    pub center: Coordinate,
    /// Points belonging to this cluster
    pub members: Vec<&'a Point<P>>,
    /// Number of members
    pub count: usize,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl<P> Point<P> {
    pub fn new(latitude: f64, longitude: f64, payload: P) -> Self {
        Self {
            latitude,
            longitude,
            payload,
        }
    }

    /// Returns the location of this point without its payload
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Checks that both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl Point<()> {
    /// Creates a point without payload
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self::new(latitude, longitude, ())
    }
}

impl<'a, P> Cluster<'a, P> {
    /// Builds a cluster whose center is the arithmetic mean of its members
    pub fn from_members(id: usize, members: Vec<&'a Point<P>>) -> Self {
        Self {
            id,
            center: centroid(&members),
            count: members.len(),
            members,
        }
    }

    /// Builds a cluster with an externally computed center
    pub fn with_center(id: usize, center: Coordinate, members: Vec<&'a Point<P>>) -> Self {
        Self {
            id,
            center,
            count: members.len(),
            members,
        }
    }

    /// Calculates cluster bounds
    ///
    /// Returns `(min, max)` where:
    /// - `min` is the south-west corner
    /// - `max` is the north-east corner
    ///
    /// Returns `None` for a cluster without members.
    pub fn bounds(&self) -> Option<(Coordinate, Coordinate)> {
        if self.members.is_empty() {
            return None;
        }

        let mut min = Coordinate::new(f64::INFINITY, f64::INFINITY);
        let mut max = Coordinate::new(f64::NEG_INFINITY, f64::NEG_INFINITY);

        for pt in &self.members {
            min.latitude = min.latitude.min(pt.latitude);
            min.longitude = min.longitude.min(pt.longitude);
            max.latitude = max.latitude.max(pt.latitude);
            max.longitude = max.longitude.max(pt.longitude);
        }

        Some((min, max))
    }
}

/// Arithmetic mean of the members' latitude and longitude
///
/// This is a planar mean, not a geodesic centroid. It is adequate at the
/// city-block scales hotspots are computed for, but it is wrong for groups
/// straddling the antimeridian. An empty slice yields `(0, 0)`.
pub fn centroid<P>(members: &[&Point<P>]) -> Coordinate {
    if members.is_empty() {
        return Coordinate::default();
    }

    let mut center = Coordinate::default();
    for pt in members {
        center.latitude += pt.latitude;
        center.longitude += pt.longitude;
    }

    let n = members.len() as f64;
    center.latitude /= n;
    center.longitude /= n;
    center
}

/// Fails on the first point with a NaN or infinite coordinate
pub fn validate_points<P>(points: &[Point<P>]) -> Result<(), ClusterError> {
    match points.iter().position(|pt| !pt.is_finite()) {
        None => Ok(()),
        Some(index) => Err(ClusterError::NonFiniteCoordinate {
            index,
            latitude: points[index].latitude,
            longitude: points[index].longitude,
        }),
    }
}
