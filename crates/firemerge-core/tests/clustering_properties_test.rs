//! Property tests for the clustering engine and geometry helpers

use firemerge_core::clustering::{ClusteringEngine, GroupingStrategy};
use firemerge_core::geo::{haversine_distance_km, BoundingBox};
use firemerge_core::models::{Fuzziness, Observation};
use proptest::prelude::*;

fn observation(lat: f64, lon: f64, minute: u32) -> Observation {
    let time = format!("{:02}{:02}", minute / 60 % 24, minute % 60);
    Observation::new(lat, lon, "2024-08-01", &time, "n", Fuzziness::default()).unwrap()
}

fn observations() -> impl Strategy<Value = Vec<Observation>> {
    prop::collection::vec((-60.0f64..60.0, -170.0f64..170.0, 0u32..1440), 0..40)
        .prop_map(|points| points.into_iter().map(|(lat, lon, m)| observation(lat, lon, m)).collect())
}

/// Points packed into a small area so that many of them merge.
fn dense_observations() -> impl Strategy<Value = Vec<Observation>> {
    prop::collection::vec((8.0f64..8.2, -80.2f64..-80.0, 0u32..1440), 0..40)
        .prop_map(|points| points.into_iter().map(|(lat, lon, m)| observation(lat, lon, m)).collect())
}

/// Points along one meridian whose decimals are all 0-4, so rounding at any
/// precision drops the trailing digits and the rounded sums cannot collide.
fn truncating_observations() -> impl Strategy<Value = Vec<Observation>> {
    prop::collection::vec((0u32..10, 0u32..=4, 0u32..=4, 0u32..=4, 0u32..1440), 0..40).prop_map(|points| {
        points
            .into_iter()
            .map(|(whole, d1, d2, d3, m)| {
                let lat = whole as f64 + (d1 * 100 + d2 * 10 + d3) as f64 / 1000.0;
                observation(lat, 0.0, m)
            })
            .collect()
    })
}

fn strategies() -> impl Strategy<Value = GroupingStrategy> {
    prop_oneof![
        (0u8..=8).prop_map(|f| GroupingStrategy::coarse_hash(f).unwrap()),
        (0.0f64..50.0).prop_map(|km| GroupingStrategy::distance_radius(km).unwrap()),
    ]
}

proptest! {
    #[test]
    fn prop_seen_counts_sum_to_input_size(obs in dense_observations(), strategy in strategies()) {
        let n = obs.len();
        let outcome = ClusteringEngine::new(strategy).unwrap().cluster(obs);
        let total: usize = outcome.clusters.iter().map(|c| c.member_count()).sum();
        prop_assert_eq!(total, n);
        prop_assert!(outcome.cluster_count() <= n);
    }

    #[test]
    fn prop_coarser_fuzziness_never_adds_fires(
        obs in truncating_observations(),
        fine in 1u8..=8,
        step in 1u8..=8,
    ) {
        let coarse = fine.saturating_sub(step);
        let count = |decimals: u8| {
            ClusteringEngine::new(GroupingStrategy::coarse_hash(decimals).unwrap())
                .unwrap()
                .cluster(obs.clone())
                .cluster_count()
        };
        prop_assert!(count(coarse) <= count(fine));
    }

    #[test]
    fn prop_clusters_are_ranked(obs in dense_observations(), strategy in strategies()) {
        let outcome = ClusteringEngine::new(strategy).unwrap().cluster(obs);
        for pair in outcome.clusters.windows(2) {
            prop_assert!(pair[0].member_count() >= pair[1].member_count());
        }
    }

    #[test]
    fn prop_members_partition_the_input(obs in observations(), strategy in strategies()) {
        let n = obs.len();
        let outcome = ClusteringEngine::new(strategy).unwrap().cluster(obs);
        let mut members: Vec<usize> = outcome.clusters.iter().flat_map(|c| c.members.clone()).collect();
        members.sort_unstable();
        prop_assert_eq!(members, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn prop_clustering_is_deterministic(obs in dense_observations(), strategy in strategies()) {
        let engine = ClusteringEngine::new(strategy).unwrap();
        let first = engine.cluster(obs.clone());
        let second = engine.cluster(obs);
        prop_assert_eq!(first.clusters.len(), second.clusters.len());
        for (a, b) in first.clusters.iter().zip(second.clusters.iter()) {
            prop_assert_eq!(&a.representative, &b.representative);
            prop_assert_eq!(&a.members, &b.members);
        }
    }

    #[test]
    fn prop_zero_radius_keeps_distinct_points_apart(obs in observations()) {
        let mut distinct: Vec<(f64, f64)> = obs.iter().map(|o| (o.latitude(), o.longitude())).collect();
        distinct.sort_by(|a, b| a.partial_cmp(b).unwrap());
        distinct.dedup();

        let outcome = ClusteringEngine::new(GroupingStrategy::distance_radius(0.0).unwrap())
            .unwrap()
            .cluster(obs);
        prop_assert_eq!(outcome.cluster_count(), distinct.len());
    }

    #[test]
    fn prop_haversine_of_coincident_points_is_zero(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
        prop_assert_eq!(haversine_distance_km(lat, lon, lat, lon), 0.0);
    }

    #[test]
    fn prop_haversine_is_symmetric(
        lat1 in -90.0f64..=90.0, lon1 in -180.0f64..=180.0,
        lat2 in -90.0f64..=90.0, lon2 in -180.0f64..=180.0,
    ) {
        let d1 = haversine_distance_km(lat1, lon1, lat2, lon2);
        let d2 = haversine_distance_km(lat2, lon2, lat1, lon1);
        prop_assert!((d1 - d2).abs() < 1e-6);
        prop_assert!(d1 >= 0.0);
    }

    #[test]
    fn prop_bounding_box_excludes_its_edges(
        lat1 in -80.0f64..0.0, lon1 in -170.0f64..0.0,
        lat2 in 1.0f64..80.0, lon2 in 1.0f64..170.0,
    ) {
        let bbox = BoundingBox::new(lat1, lon1, lat2, lon2);
        prop_assert!(!bbox.contains(lat1, (lon1 + lon2) / 2.0));
        prop_assert!(!bbox.contains(lat2, (lon1 + lon2) / 2.0));
        prop_assert!(!bbox.contains((lat1 + lat2) / 2.0, lon1));
        prop_assert!(!bbox.contains((lat1 + lat2) / 2.0, lon2));
        prop_assert!(bbox.contains((lat1 + lat2) / 2.0, (lon1 + lon2) / 2.0));
    }
}

#[test]
fn test_empty_input_yields_no_fires() {
    for strategy in [GroupingStrategy::default(), GroupingStrategy::distance_radius(5.0).unwrap()] {
        let outcome = ClusteringEngine::new(strategy).unwrap().cluster(Vec::new());
        assert_eq!(outcome.cluster_count(), 0);
        assert_eq!(outcome.observation_count, 0);
    }
}
