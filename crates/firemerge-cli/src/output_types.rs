use firemerge_core::config::ConfigSource;
use firemerge_core::loader::LoadReport;
use firemerge_core::report::{ClusterRow, MergeSummary, ReportFormat};
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::Tabled;

/// Row of the fire summary table
#[derive(Debug, Tabled)]
pub struct FireTableRow {
    #[tabled(rename = "Seen Count")]
    pub seen_count: usize,
    #[tabled(rename = "First Seen Date")]
    pub first_seen: String,
    #[tabled(rename = "Latitude")]
    pub latitude: f64,
    #[tabled(rename = "Longitude")]
    pub longitude: f64,
}

impl From<ClusterRow> for FireTableRow {
    fn from(row: ClusterRow) -> Self {
        Self {
            seen_count: row.seen_count,
            first_seen: row.first_seen,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

/// Output for a merge run
#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub config_file: String,
    /// Effective settings as `[value, source]`
    pub config: BTreeMap<String, (String, ConfigSource)>,
    pub output_file: String,
    pub format: ReportFormat,
    pub strategy: String,
    pub load: LoadReport,
    pub summary: MergeSummary,
    pub downloads: Option<DownloadOutput>,
    pub fires: Vec<ClusterRow>,
}

/// Output for the download step
#[derive(Debug, Serialize)]
pub struct DownloadOutput {
    pub saved: Vec<String>,
    pub skipped: Vec<SkippedFeed>,
}

#[derive(Debug, Serialize)]
pub struct SkippedFeed {
    pub url: String,
    pub reason: String,
}
