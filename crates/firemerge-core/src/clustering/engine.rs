use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::strategy::GroupingStrategy;
use super::union_find::UnionFind;
use crate::error::Result;
use crate::geo::haversine_distance_km;
use crate::models::cluster::ClusterKey;
use crate::models::{CoarseKey, FireCluster, Observation};

/// Result of one clustering pass
#[derive(Debug, Clone, Serialize)]
pub struct ClusterOutcome {
    /// Strategy the pass ran with
    pub strategy: GroupingStrategy,

    /// Number of observations given to the engine
    pub observation_count: usize,

    /// Fires ranked by member count, largest first
    pub clusters: Vec<FireCluster>,
}

impl ClusterOutcome {
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Observations folded into another record.
    pub fn merged_count(&self) -> usize {
        self.observation_count - self.clusters.len()
    }
}

/// Groups observations into fires with a fixed [`GroupingStrategy`].
#[derive(Debug, Clone)]
pub struct ClusteringEngine {
    strategy: GroupingStrategy,
}

impl ClusteringEngine {
    pub fn new(strategy: GroupingStrategy) -> Result<Self> {
        strategy.validate()?;
        Ok(Self { strategy })
    }

    pub fn strategy(&self) -> &GroupingStrategy {
        &self.strategy
    }

    /// Cluster `observations` and rank the resulting fires.
    ///
    /// The pass walks the observations in input order. Each one absorbs every
    /// other observation still in the shared pool that it matches, raising its
    /// own `seen_count` once per absorbed observation; an absorbed observation
    /// is never offered to later ones. Observations are then stably ordered by
    /// `seen_count`, and the first observation of each cluster key in that
    /// order becomes the representative, carrying the size of its cluster.
    ///
    /// For [`GroupingStrategy::CoarseHash`] the key is the coarse hash. For
    /// [`GroupingStrategy::DistanceRadius`] proximity is not transitive, so the
    /// key is the connected component of the within-radius relation: a chain
    /// of detections each within the radius of the next is one fire.
    pub fn cluster(&self, observations: Vec<Observation>) -> ClusterOutcome {
        let observation_count = observations.len();
        let mut primary = observations;

        let coarse_keys: Vec<CoarseKey> = match self.strategy {
            GroupingStrategy::CoarseHash { fuzziness } => {
                primary.iter().map(|o| o.coarse_key_at(fuzziness)).collect()
            }
            GroupingStrategy::DistanceRadius { .. } => Vec::new(),
        };

        let consumed = self.absorb_pass(&mut primary, &coarse_keys);
        tracing::debug!(
            observations = observation_count,
            consumed,
            strategy = %self.strategy,
            "Pairwise pass complete"
        );

        // Stable: equal counts keep input order
        let mut order: Vec<usize> = (0..primary.len()).collect();
        order.sort_by(|a, b| primary[*b].seen_count().cmp(&primary[*a].seen_count()));

        let keys = self.cluster_keys(&primary, &coarse_keys);
        let mut members: HashMap<ClusterKey, Vec<usize>> = HashMap::new();
        for (idx, key) in keys.iter().enumerate() {
            members.entry(*key).or_default().push(idx);
        }

        let mut seen_keys = HashSet::new();
        let mut clusters = Vec::with_capacity(members.len());
        for idx in order {
            let key = keys[idx];
            if !seen_keys.insert(key) {
                continue;
            }

            let group = members.remove(&key).unwrap_or_default();
            let mut representative = primary[idx].clone();
            representative.set_seen_count(group.len());
            clusters.push(FireCluster { representative, key, members: group });
        }

        clusters.sort_by(|a, b| b.member_count().cmp(&a.member_count()));

        tracing::info!(
            observations = observation_count,
            fires = clusters.len(),
            "Merged {} observations into {} fires",
            observation_count,
            clusters.len()
        );

        ClusterOutcome { strategy: self.strategy, observation_count, clusters }
    }

    /// The pairwise absorption pass. Returns how many observations were consumed.
    fn absorb_pass(&self, primary: &mut [Observation], coarse_keys: &[CoarseKey]) -> usize {
        let mut pool: Vec<usize> = (0..primary.len()).collect();

        for i in 0..primary.len() {
            let mut remaining = Vec::with_capacity(pool.len());
            for &j in &pool {
                // never compare an observation with itself; it stays available
                if j == i {
                    remaining.push(j);
                    continue;
                }

                if self.same_fire(primary, coarse_keys, i, j) {
                    primary[i].record_sighting();
                } else {
                    remaining.push(j);
                }
            }
            pool = remaining;
        }

        primary.len() - pool.len()
    }

    fn same_fire(&self, primary: &[Observation], coarse_keys: &[CoarseKey], i: usize, j: usize) -> bool {
        match self.strategy {
            GroupingStrategy::CoarseHash { .. } => coarse_keys[i] == coarse_keys[j],
            GroupingStrategy::DistanceRadius { km } => within_radius(&primary[i], &primary[j], km),
        }
    }

    fn cluster_keys(&self, primary: &[Observation], coarse_keys: &[CoarseKey]) -> Vec<ClusterKey> {
        match self.strategy {
            GroupingStrategy::CoarseHash { .. } => {
                coarse_keys.iter().map(|k| ClusterKey::Coarse(*k)).collect()
            }
            GroupingStrategy::DistanceRadius { km } => {
                let mut components = UnionFind::new(primary.len());
                for i in 0..primary.len() {
                    for j in (i + 1)..primary.len() {
                        if within_radius(&primary[i], &primary[j], km) {
                            components.union(i, j);
                        }
                    }
                }
                (0..primary.len()).map(|i| ClusterKey::Component(components.find(i))).collect()
            }
        }
    }
}

fn within_radius(a: &Observation, b: &Observation, km: f64) -> bool {
    haversine_distance_km(a.latitude(), a.longitude(), b.latitude(), b.longitude()) <= km
}
