//! Projections of ranked clusters for output
//!
//! Nothing here makes clustering decisions; every function maps clusters
//! one-to-one onto rows, features or lines.

pub mod feature_collection;
pub mod lines;
pub mod summary;
pub mod table;

pub use feature_collection::{to_feature, to_feature_collection, write_feature_collection};
pub use lines::{to_line, write_lines};
pub use summary::MergeSummary;
pub use table::{to_rows, ClusterRow, TABLE_HEADERS};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::models::FireCluster;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// GeoJSON feature collection
    #[default]
    GeoJson,
    /// One JSON object per line
    Lines,
}

impl ReportFormat {
    /// Write `clusters` to `path` in this format, replacing any existing file.
    pub fn write(&self, clusters: &[FireCluster], path: &Path) -> Result<()> {
        match self {
            ReportFormat::GeoJson => write_feature_collection(clusters, path),
            ReportFormat::Lines => write_lines(clusters, path),
        }
    }
}
