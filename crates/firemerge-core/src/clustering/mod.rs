//! Clustering of repeated detections into fires
//!
//! One engine handles both grouping criteria: equality of coarse coordinate
//! hashes, or great-circle distance within a fixed radius.

pub mod engine;
pub mod strategy;
mod union_find;

pub use engine::{ClusterOutcome, ClusteringEngine};
pub use strategy::GroupingStrategy;
