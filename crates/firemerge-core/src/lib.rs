//! firemerge core - observation model, clustering and reporting
//!
//! This crate contains the domain logic for merging satellite thermal-anomaly
//! detections into distinct wildfires: CSV loading with region filtering, the
//! clustering engine, report rendering, layered configuration and feed download.

pub mod clustering;
pub mod config;
pub mod error;
pub mod fetch;
pub mod geo;
pub mod loader;
pub mod models;
pub mod report;

pub use error::{FireError, Result};
