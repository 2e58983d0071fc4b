use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FireError, Result};
use crate::models::Fuzziness;

/// How two detections are judged to be the same fire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum GroupingStrategy {
    /// Same fire when the coarse coordinate hashes are equal
    CoarseHash { fuzziness: Fuzziness },

    /// Same fire when the great-circle distance is at most `km`
    DistanceRadius { km: f64 },
}

impl GroupingStrategy {
    pub fn coarse_hash(decimals: u8) -> Result<Self> {
        Ok(GroupingStrategy::CoarseHash { fuzziness: Fuzziness::new(decimals)? })
    }

    pub fn distance_radius(km: f64) -> Result<Self> {
        let strategy = GroupingStrategy::DistanceRadius { km };
        strategy.validate()?;
        Ok(strategy)
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            GroupingStrategy::CoarseHash { .. } => Ok(()),
            GroupingStrategy::DistanceRadius { km } if km.is_finite() && *km >= 0.0 => Ok(()),
            GroupingStrategy::DistanceRadius { km } => Err(FireError::InvalidStrategy {
                reason: format!("radius must be a finite, non-negative number of kilometres, got {}", km),
            }),
        }
    }

    /// Human-readable merge distance, e.g. `1.11 km`.
    pub fn merge_threshold(&self) -> String {
        match self {
            GroupingStrategy::CoarseHash { fuzziness } => fuzziness.resolution().to_string(),
            GroupingStrategy::DistanceRadius { km } => format!("{} km", km),
        }
    }
}

impl Default for GroupingStrategy {
    fn default() -> Self {
        GroupingStrategy::CoarseHash { fuzziness: Fuzziness::default() }
    }
}

impl fmt::Display for GroupingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupingStrategy::CoarseHash { fuzziness } => write!(f, "coarse hash (fuzziness {})", fuzziness),
            GroupingStrategy::DistanceRadius { km } => write!(f, "distance radius ({} km)", km),
        }
    }
}
