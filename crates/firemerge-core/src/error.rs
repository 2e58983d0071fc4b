//! Error types for firemerge

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FireError {
    // Row errors
    #[error("Invalid timestamp '{date} {time}': expected YYYY-MM-DD HHMM")]
    InvalidTimestamp { date: String, time: String },

    #[error("Invalid coordinate ({lat}, {lon}): {reason}")]
    InvalidCoordinate { lat: f64, lon: f64, reason: String },

    #[error("Unparsable row: {reason}")]
    RowParse { reason: String },

    // Strategy errors
    #[error("Invalid grouping strategy: {reason}")]
    InvalidStrategy { reason: String },

    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigMissing { path: PathBuf },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Download errors
    #[error("HTTP error for {url}: {reason}")]
    Http { url: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, FireError>;
