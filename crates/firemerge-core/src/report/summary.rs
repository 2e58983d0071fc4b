use serde::Serialize;

use crate::clustering::ClusterOutcome;

/// Merge-ratio figures printed after a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeSummary {
    /// Distance under which detections merge, e.g. `1.11 km`
    pub threshold: String,
    pub observations: usize,
    pub fires: usize,
}

impl MergeSummary {
    pub fn from_outcome(outcome: &ClusterOutcome) -> Self {
        Self {
            threshold: outcome.strategy.merge_threshold(),
            observations: outcome.observation_count,
            fires: outcome.cluster_count(),
        }
    }

    pub fn threshold_line(&self) -> String {
        format!("Fires must be within {} of one another to be merged.", self.threshold)
    }

    pub fn ratio_line(&self) -> String {
        format!("Merged {} observations into {} wildfires.", self.observations, self.fires)
    }
}
