use std::collections::HashMap;

use super::error::ClusterError;
use super::point::{Cluster, Coordinate, Point, validate_points};

/// Default grid cell size in degrees (~500 m at the equator)
pub const DEFAULT_CELL_SIZE_DEG: f64 = 0.005;

/// Bins points into fixed-size lat/lon cells
///
/// Every point lands in exactly one cell, keyed by
/// `(floor(lat / cell), floor(lon / cell))`. A cell with a single point still
/// forms a cluster. The cell is degree-based, so its metric width shrinks
/// with latitude.
///
/// The center of each cluster is the middle of its cell, independent of where
/// the members actually are. Clusters are returned in the order their cells
/// were first seen.
///
/// A cell size so small that a cell index no longer fits in an `i64` is
/// rejected with [`ClusterError::InvalidCellSize`].
pub fn grid_bin<P>(points: &[Point<P>], cell_size: f64) -> Result<Vec<Cluster<'_, P>>, ClusterError> {
    if !cell_size.is_finite() || cell_size <= 0.0 {
        return Err(ClusterError::InvalidCellSize(cell_size));
    }
    validate_points(points)?;

    let mut cells: HashMap<(i64, i64), usize> = HashMap::new();
    let mut groups: Vec<((i64, i64), Vec<&Point<P>>)> = Vec::new();

    for pt in points {
        let key = cell_key(pt, cell_size).ok_or(ClusterError::InvalidCellSize(cell_size))?;
        match cells.get(&key) {
            Some(&slot) => groups[slot].1.push(pt),
            None => {
                cells.insert(key, groups.len());
                groups.push((key, vec![pt]));
            }
        }
    }

    let clusters: Vec<_> = groups
        .into_iter()
        .enumerate()
        .map(|(id, (key, members))| Cluster::with_center(id, cell_center(key, cell_size), members))
        .collect();

    tracing::debug!(
        points = points.len(),
        cell_size,
        clusters = clusters.len(),
        "grid binning done"
    );

    Ok(clusters)
}

fn cell_key<P>(pt: &Point<P>, cell_size: f64) -> Option<(i64, i64)> {
    Some((
        cell_index(pt.latitude, cell_size)?,
        cell_index(pt.longitude, cell_size)?,
    ))
}

/// `floor(coord / cell_size)`, or `None` when `as i64` would saturate
fn cell_index(coord: f64, cell_size: f64) -> Option<i64> {
    let index = (coord / cell_size).floor();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    (index >= i64::MIN as f64 && index < i64::MAX as f64).then_some(index as i64)
}

/// Lower-left corner of the cell plus half a cell
fn cell_center(key: (i64, i64), cell_size: f64) -> Coordinate {
    Coordinate::new(
        key.0 as f64 * cell_size + cell_size / 2.0,
        key.1 as f64 * cell_size + cell_size / 2.0,
    )
}
