//! Geo module for the spatial primitives used by loading and clustering
//!
//! This module provides great-circle distance and the rectangular region filter.

pub mod bbox;
pub mod distance;

// Re-export key types for convenience
pub use bbox::{is_in_bounding_box, BoundingBox};
pub use distance::{haversine_distance_km, EARTH_RADIUS_KM};
