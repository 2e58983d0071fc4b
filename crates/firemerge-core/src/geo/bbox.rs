use serde::{Deserialize, Serialize};

/// Rectangular region given as two corners, `[lat1, lon1, lat2, lon2]`.
///
/// The corners are used as-is: `lat1`/`lon1` must be the lower bounds and
/// `lat2`/`lon2` the upper bounds, otherwise the box contains nothing.
/// Serialized as a plain 4-element array, which is how feed configs write it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub lat1: f64,
    pub lon1: f64,
    pub lat2: f64,
    pub lon2: f64,
}

impl BoundingBox {
    pub fn new(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Self {
        Self { lat1, lon1, lat2, lon2 }
    }

    /// Strict containment: points on an edge or corner are outside.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.lat1 < lat && lat < self.lat2 && self.lon1 < lon && lon < self.lon2
    }

    /// False when the corners are inverted or collapsed, i.e. nothing can match.
    pub fn is_satisfiable(&self) -> bool {
        self.lat1 < self.lat2 && self.lon1 < self.lon2
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([lat1, lon1, lat2, lon2]: [f64; 4]) -> Self {
        Self::new(lat1, lon1, lat2, lon2)
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.lat1, bbox.lon1, bbox.lat2, bbox.lon2]
    }
}

/// Check whether a coordinate lies strictly inside `bbox`.
pub fn is_in_bounding_box(lat: f64, lon: f64, bbox: &BoundingBox) -> bool {
    bbox.contains(lat, lon)
}
