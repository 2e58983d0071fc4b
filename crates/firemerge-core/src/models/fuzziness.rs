use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FireError, Result};

/// Coordinate-rounding precision used by coarse hashing.
///
/// The value is the number of decimal places kept from latitude and
/// longitude. Higher values keep more digits, so two detections must be
/// closer together to share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Fuzziness(u8);

impl Fuzziness {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 8;

    pub fn new(decimals: u8) -> Result<Self> {
        if decimals > Self::MAX {
            return Err(FireError::InvalidStrategy {
                reason: format!(
                    "fuzziness must be between {} and {}, got {}",
                    Self::MIN,
                    Self::MAX,
                    decimals
                ),
            });
        }
        Ok(Self(decimals))
    }

    /// Number of decimal places kept.
    pub fn decimals(&self) -> u8 {
        self.0
    }

    /// Round a coordinate to this precision, ties to even.
    pub fn round(&self, degrees: f64) -> f64 {
        let scale = 10f64.powi(self.0 as i32);
        (degrees * scale).round_ties_even() / scale
    }

    /// Approximate ground distance of one unit in the last kept decimal place.
    pub fn resolution(&self) -> Resolution {
        let (value, unit) = match self.0 {
            0 => (111.0, "km"),
            1 => (11.1, "km"),
            2 => (1.11, "km"),
            3 => (111.0, "m"),
            4 => (11.1, "m"),
            5 => (1.11, "m"),
            6 => (0.111, "m"),
            7 => (1.11, "cm"),
            _ => (1.11, "mm"),
        };
        Resolution { value, unit }
    }
}

impl Default for Fuzziness {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<u8> for Fuzziness {
    type Error = FireError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Fuzziness> for u8 {
    fn from(f: Fuzziness) -> Self {
        f.0
    }
}

impl fmt::Display for Fuzziness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ground distance with a display unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub value: f64,
    pub unit: &'static str,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}
