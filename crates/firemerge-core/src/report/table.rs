use serde::Serialize;

use crate::models::FireCluster;

/// Column headers of the summary table.
pub const TABLE_HEADERS: [&str; 4] = ["Seen Count", "First Seen Date", "Latitude", "Longitude"];

/// One row of the summary table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterRow {
    pub seen_count: usize,
    /// `YYYY-MM-DD HH:MM:SS`
    pub first_seen: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&FireCluster> for ClusterRow {
    fn from(cluster: &FireCluster) -> Self {
        Self {
            seen_count: cluster.member_count(),
            first_seen: cluster.first_seen().format("%Y-%m-%d %H:%M:%S").to_string(),
            latitude: cluster.representative.latitude(),
            longitude: cluster.representative.longitude(),
        }
    }
}

pub fn to_rows(clusters: &[FireCluster]) -> Vec<ClusterRow> {
    clusters.iter().map(ClusterRow::from).collect()
}
