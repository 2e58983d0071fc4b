pub mod cluster;
pub mod fuzziness;
pub mod observation;

pub use cluster::{ClusterKey, FireCluster};
pub use fuzziness::{Fuzziness, Resolution};
pub use observation::{CoarseKey, Observation};
