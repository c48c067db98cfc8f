use std::collections::HashMap;
use std::hash::Hash;

use super::error::ClusterError;
use super::point::{Cluster, Point, validate_points};

/// Groups points by an externally computed region key
///
/// `region_of` is the classifier, e.g. a polygon-containment lookup against
/// administrative boundaries. Each distinct key yields exactly one cluster and
/// no point is dropped. Centers are the arithmetic mean of the members.
/// Clusters are returned in the order their keys were first produced.
pub fn region_aggregate<'a, P, K, F>(
    points: &'a [Point<P>],
    mut region_of: F,
) -> Result<Vec<Cluster<'a, P>>, ClusterError>
where
    K: Eq + Hash,
    F: FnMut(&Point<P>) -> K,
{
    validate_points(points)?;

    let mut regions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Vec<&'a Point<P>>> = Vec::new();

    for pt in points {
        let slot = *regions.entry(region_of(pt)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(pt);
    }

    let clusters: Vec<_> = groups
        .into_iter()
        .enumerate()
        .map(|(id, members)| Cluster::from_members(id, members))
        .collect();

    tracing::debug!(
        points = points.len(),
        regions = clusters.len(),
        "region aggregation done"
    );

    Ok(clusters)
}
