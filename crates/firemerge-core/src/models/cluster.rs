use serde::Serialize;

use super::{CoarseKey, Observation};

/// Identity of a cluster during deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ClusterKey {
    /// Shared coarse hash
    Coarse(CoarseKey),
    /// Connected component of the within-radius relation, named by its
    /// lowest input index
    Component(usize),
}

/// A group of detections judged to be one physical fire.
#[derive(Debug, Clone, Serialize)]
pub struct FireCluster {
    /// The member chosen to stand for the whole group
    pub representative: Observation,

    /// Grouping key shared by every member
    pub key: ClusterKey,

    /// Positions of all members in the engine's input, ascending
    pub members: Vec<usize>,
}

impl FireCluster {
    /// Number of detections merged into this fire.
    pub fn member_count(&self) -> usize {
        self.representative.seen_count()
    }

    /// Timestamp reported as "first seen": the representative's acquisition time.
    pub fn first_seen(&self) -> chrono::NaiveDateTime {
        self.representative.acquired_at()
    }
}
