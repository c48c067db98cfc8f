#[cfg(test)]
mod tests {
    use crate::cluster::{
        ClusterError, KMeansParams, Point, centroid, k_means, k_means_seeded, kmeans_plus_plus,
    };
    use crate::cluster::Coordinate;
    use crate::cluster::kmeans::{CONVERGENCE_DEG, centroid_shift, update_centroids};
    use quickcheck::quickcheck;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn two_blobs() -> Vec<Point<char>> {
        let mut points = Vec::new();
        for (dlat, dlon) in [(0.0, 0.0), (0.001, 0.0), (0.0, 0.001), (-0.001, 0.0), (0.0, -0.001)] {
            points.push(Point::new(dlat, dlon, 'a'));
            points.push(Point::new(1.0 + dlat, 1.0 + dlon, 'b'));
        }
        points
    }

    #[test]
    fn test_kmeans_k_above_count_gives_singletons() {
        let points = vec![
            Point::at(40.7128, -74.0060),
            Point::at(40.7500, -73.9900),
            Point::at(41.0000, -74.0000),
        ];
        let clusters = k_means_seeded(&points, 10, 50, 7).unwrap();

        assert_eq!(clusters.len(), points.len());
        for p in &points {
            let owner: Vec<_> = clusters
                .iter()
                .filter(|c| c.members.iter().any(|m| std::ptr::eq(*m, p)))
                .collect();
            assert_eq!(owner.len(), 1);
            assert_eq!(owner[0].count, 1);
            assert_eq!(owner[0].center, p.coordinate());
        }
    }

    #[test]
    fn test_kmeans_two_blobs() {
        let points = two_blobs();
        let clusters = k_means_seeded(&points, 2, 100, 42).unwrap();

        assert_eq!(clusters.len(), 2);
        for cluster in &clusters {
            assert_eq!(cluster.count, 5);
            let tag = cluster.members[0].payload;
            assert!(cluster.members.iter().all(|m| m.payload == tag));
        }
    }

    #[test]
    fn test_kmeans_center_is_mean_of_members() {
        let points = two_blobs();
        let clusters = k_means_seeded(&points, 3, 100, 3).unwrap();
        for (i, cluster) in clusters.iter().enumerate() {
            assert_eq!(cluster.id, i);
            assert_eq!(cluster.count, cluster.members.len());
            assert!(cluster.count > 0);
            assert_eq!(cluster.center, centroid(&cluster.members));
        }
    }

    #[test]
    fn test_kmeans_same_seed_same_result() {
        let points: Vec<Point> = (0..40)
            .map(|i| Point::at((i % 7) as f64 * 0.01, (i / 7) as f64 * 0.013))
            .collect();

        let a = k_means_seeded(&points, 4, 20, 1234).unwrap();
        let b = k_means_seeded(&points, 4, 20, 1234).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.center, y.center);
            assert_eq!(x.count, y.count);
        }
    }

    #[test]
    fn test_kmeans_injected_rng() {
        let points = two_blobs();
        let mut rng = StdRng::seed_from_u64(99);
        let clusters = k_means(&points, 2, 100, &mut rng).unwrap();
        assert_eq!(clusters.iter().map(|c| c.count).sum::<usize>(), points.len());
    }

    #[test]
    fn test_kmeans_identical_points_collapse_to_one_cluster() {
        let points = vec![Point::at(5.0, 5.0); 6];
        let clusters = k_means_seeded(&points, 3, 10, 0).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].count, 6);
        assert_eq!(clusters[0].id, 0);
    }

    #[test]
    fn test_kmeans_zero_iterations_still_partitions() {
        let points = two_blobs();
        let clusters = k_means_seeded(&points, 2, 0, 5).unwrap();
        assert_eq!(clusters.iter().map(|c| c.count).sum::<usize>(), points.len());
    }

    #[test]
    fn test_kmeans_empty() {
        let points: Vec<Point> = Vec::new();
        assert!(k_means_seeded(&points, 3, 10, 0).unwrap().is_empty());
    }

    #[test]
    fn test_kmeans_rejects_bad_params() {
        let points = two_blobs();
        assert_eq!(
            k_means_seeded(&points, 0, 10, 0).unwrap_err(),
            ClusterError::InvalidK(0)
        );
        let bad = vec![Point::at(0.0, f64::NAN)];
        assert!(matches!(
            k_means_seeded(&bad, 1, 10, 0),
            Err(ClusterError::NonFiniteCoordinate { index: 0, .. })
        ));
        assert!(KMeansParams::default().validate().is_ok());
    }

    #[test]
    fn test_update_centroids_keeps_empty_centroid() {
        let points = vec![Point::at(1.0, 1.0), Point::at(3.0, 5.0), Point::at(10.0, 10.0)];
        let previous = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(-40.0, 120.0),
            Coordinate::new(9.0, 9.0),
        ];
        // Nothing is assigned to centroid 1
        let updated = update_centroids(&points, &[0, 0, 2], &previous);

        assert_eq!(updated.len(), 3);
        assert_eq!(updated[0], Coordinate::new(2.0, 3.0));
        assert_eq!(updated[1], previous[1]);
        assert_eq!(updated[2], Coordinate::new(10.0, 10.0));
    }

    #[test]
    fn test_centroid_shift_against_convergence_threshold() {
        let old = vec![Coordinate::new(10.0, 20.0), Coordinate::new(-5.0, 7.0)];
        let small = vec![Coordinate::new(10.00005, 20.0), Coordinate::new(-5.0, 7.00009)];
        let large = vec![Coordinate::new(10.0, 20.0), Coordinate::new(-5.0, 7.0002)];

        assert!(centroid_shift(&old, &old) == 0.0);
        assert!(centroid_shift(&old, &small) < CONVERGENCE_DEG);
        assert!(centroid_shift(&old, &large) >= CONVERGENCE_DEG);
        assert_eq!(CONVERGENCE_DEG, 0.0001);
    }

    #[test]
    fn test_kmeans_converged_result_is_stable_under_more_iterations() {
        // Once centroids stop moving, extra iterations change nothing
        let points = two_blobs();
        let a = k_means_seeded(&points, 2, 10, 8).unwrap();
        let b = k_means_seeded(&points, 2, 10_000, 8).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.center, y.center);
            assert_eq!(x.count, y.count);
        }
    }

    #[test]
    fn test_kmeans_plus_plus_picks_distinct_points() {
        let points: Vec<Point> = (0..8).map(|i| Point::at(i as f64, -(i as f64))).collect();
        let mut rng = StdRng::seed_from_u64(11);
        let mut seeds = kmeans_plus_plus(&points, 8, &mut rng);
        assert_eq!(seeds.len(), 8);
        seeds.sort_by(|a, b| a.latitude.total_cmp(&b.latitude));
        for (i, s) in seeds.iter().enumerate() {
            assert_eq!(s.latitude, i as f64);
        }
    }

    quickcheck! {
        fn prop_kmeans_is_strict_partition(coords: Vec<(i8, i8)>, k: u8, seed: u64) -> bool {
            let points: Vec<Point<usize>> = coords
                .iter()
                .enumerate()
                .map(|(i, &(a, b))| Point::new(a as f64 * 0.01, b as f64 * 0.01, i))
                .collect();
            let k = (k % 12) as usize + 1;
            let clusters = k_means_seeded(&points, k, 25, seed).unwrap();

            let mut seen = vec![0usize; points.len()];
            for c in &clusters {
                for m in &c.members {
                    seen[m.payload] += 1;
                }
            }
            clusters.len() <= k
                && clusters.iter().all(|c| c.count > 0 && c.count == c.members.len())
                && seen.iter().all(|&n| n == 1)
        }

        fn prop_kmeans_singletons_when_k_covers_all(coords: Vec<(i8, i8)>, seed: u64) -> bool {
            let mut distinct: Vec<(i8, i8)> = coords;
            distinct.sort_unstable();
            distinct.dedup();
            let points: Vec<Point> = distinct
                .iter()
                .map(|&(a, b)| Point::at(a as f64 * 0.01, b as f64 * 0.01))
                .collect();
            let clusters = k_means_seeded(&points, points.len() + 3, 25, seed).unwrap();

            clusters.len() == points.len()
                && clusters
                    .iter()
                    .all(|c| c.count == 1 && c.center == c.members[0].coordinate())
        }
    }
}
