use chrono::NaiveDateTime;
use serde::Serialize;

use super::Fuzziness;
use crate::error::{FireError, Result};

/// Format of the combined `acq_date` + `acq_time` columns.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H%M";

/// Coordinates rounded to a [`Fuzziness`] level and summed.
///
/// Equal keys mean the rounded coordinates add up to the same value, which
/// is the cheap "probably the same place" test used by coarse clustering.
/// Keys compare by the rounded sum itself; the Adler-32 checksum of its
/// decimal text is carried along for output only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CoarseKey {
    /// Rounded sum in units of the last kept decimal place
    cell: i64,
    checksum: u32,
}

impl CoarseKey {
    pub fn compute(lat: f64, lon: f64, fuzziness: Fuzziness) -> Self {
        let decimals = fuzziness.decimals();
        let scale = 10f64.powi(decimals as i32);
        let sum = fuzziness.round(lat) + fuzziness.round(lon);
        let cell = (sum * scale).round() as i64;

        // rendered from the cell so -0.0 and sum noise never reach the text
        let text = format!("{:.*}", decimals as usize, cell as f64 / scale);

        CoarseKey {
            cell,
            checksum: adler::adler32_slice(text.as_bytes()),
        }
    }

    pub fn cell(&self) -> i64 {
        self.cell
    }

    /// Adler-32 of the rounded sum's decimal text, e.g. of `"30.00"`.
    pub fn checksum(&self) -> u32 {
        self.checksum
    }
}

/// A single thermal-anomaly detection.
///
/// Everything except `seen_count` is fixed at construction. The count starts
/// at one and is only raised by the clustering engine while it merges
/// repeated sightings into this record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    latitude: f64,
    longitude: f64,
    acquisition_date: String,
    acquisition_time: String,
    acquired_at: NaiveDateTime,
    confidence: String,
    fuzziness: Fuzziness,
    coarse_key: CoarseKey,
    seen_count: usize,
}

impl Observation {
    /// Build an observation from raw feed values.
    ///
    /// Fails with [`FireError::InvalidCoordinate`] for non-finite or
    /// out-of-range coordinates and [`FireError::InvalidTimestamp`] when the
    /// date and time do not form a valid `YYYY-MM-DD HHMM` timestamp.
    pub fn new(
        latitude: f64,
        longitude: f64,
        acquisition_date: &str,
        acquisition_time: &str,
        confidence: impl Into<String>,
        fuzziness: Fuzziness,
    ) -> Result<Self> {
        validate_coordinate(latitude, longitude)?;

        let date = acquisition_date.trim();
        let time = normalize_time(acquisition_time.trim());
        let acquired_at = NaiveDateTime::parse_from_str(&format!("{} {}", date, time), TIMESTAMP_FORMAT)
            .map_err(|_| FireError::InvalidTimestamp {
                date: acquisition_date.to_string(),
                time: acquisition_time.to_string(),
            })?;

        Ok(Self {
            latitude,
            longitude,
            acquisition_date: date.to_string(),
            acquisition_time: time,
            acquired_at,
            confidence: confidence.into(),
            fuzziness,
            coarse_key: CoarseKey::compute(latitude, longitude, fuzziness),
            seen_count: 1,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn acquisition_date(&self) -> &str {
        &self.acquisition_date
    }

    pub fn acquisition_time(&self) -> &str {
        &self.acquisition_time
    }

    /// Date and time of the detection, combined.
    pub fn acquired_at(&self) -> NaiveDateTime {
        self.acquired_at
    }

    pub fn confidence(&self) -> &str {
        &self.confidence
    }

    /// Precision the coarse key was computed with.
    pub fn fuzziness(&self) -> Fuzziness {
        self.fuzziness
    }

    pub fn coarse_key(&self) -> CoarseKey {
        self.coarse_key
    }

    /// Coarse key at `fuzziness`, reusing the stored one when the precision matches.
    pub fn coarse_key_at(&self, fuzziness: Fuzziness) -> CoarseKey {
        if fuzziness == self.fuzziness {
            self.coarse_key
        } else {
            CoarseKey::compute(self.latitude, self.longitude, fuzziness)
        }
    }

    /// Number of raw detections merged into this record, itself included.
    pub fn seen_count(&self) -> usize {
        self.seen_count
    }

    pub(crate) fn record_sighting(&mut self) {
        self.seen_count += 1;
    }

    pub(crate) fn set_seen_count(&mut self, count: usize) {
        self.seen_count = count;
    }
}

fn validate_coordinate(lat: f64, lon: f64) -> Result<()> {
    let reason = if !lat.is_finite() || !lon.is_finite() {
        Some("coordinates must be finite")
    } else if !(-90.0..=90.0).contains(&lat) {
        Some("latitude must be within [-90, 90]")
    } else if !(-180.0..=180.0).contains(&lon) {
        Some("longitude must be within [-180, 180]")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(FireError::InvalidCoordinate { lat, lon, reason: reason.to_string() }),
        None => Ok(()),
    }
}

/// Left-pad purely numeric times such as `"342"` to `"0342"`.
fn normalize_time(time: &str) -> String {
    if !time.is_empty() && time.len() < 4 && time.bytes().all(|b| b.is_ascii_digit()) {
        format!("{:0>4}", time)
    } else {
        time.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn fuzz(decimals: u8) -> Fuzziness {
        Fuzziness::new(decimals).unwrap()
    }

    #[test]
    fn test_new_combines_timestamp() {
        let obs = Observation::new(10.5, 20.25, "2020-08-21", "0342", "nominal", fuzz(2)).unwrap();
        let expected = NaiveDate::from_ymd_opt(2020, 8, 21).unwrap().and_hms_opt(3, 42, 0).unwrap();
        assert_eq!(obs.acquired_at(), expected);
        assert_eq!(obs.seen_count(), 1);
        assert_eq!(obs.confidence(), "nominal");
    }

    #[test]
    fn test_short_time_is_padded() {
        let obs = Observation::new(1.0, 1.0, "2020-08-21", "342", "n", fuzz(2)).unwrap();
        assert_eq!(obs.acquisition_time(), "0342");
        assert_eq!(obs.acquired_at().hour(), 3);

        let midnight = Observation::new(1.0, 1.0, "2020-08-21", "5", "n", fuzz(2)).unwrap();
        assert_eq!(midnight.acquired_at().minute(), 5);
    }

    #[test]
    fn test_invalid_timestamp() {
        let header = Observation::new(1.0, 1.0, "acq_date", "acq_time", "confidence", fuzz(2));
        assert!(matches!(header, Err(FireError::InvalidTimestamp { .. })));

        let bad_hour = Observation::new(1.0, 1.0, "2020-08-21", "2560", "n", fuzz(2));
        assert!(matches!(bad_hour, Err(FireError::InvalidTimestamp { .. })));

        let bad_day = Observation::new(1.0, 1.0, "2020-02-30", "1200", "n", fuzz(2));
        assert!(matches!(bad_day, Err(FireError::InvalidTimestamp { .. })));
    }

    #[test]
    fn test_invalid_coordinates() {
        for (lat, lon) in [(91.0, 0.0), (0.0, -180.5), (f64::NAN, 0.0), (0.0, f64::INFINITY)] {
            let result = Observation::new(lat, lon, "2020-08-21", "1200", "n", fuzz(2));
            assert!(matches!(result, Err(FireError::InvalidCoordinate { .. })), "{} {}", lat, lon);
        }
    }

    #[test]
    fn test_coarse_key_depends_on_precision() {
        let a = CoarseKey::compute(10.000, 20.000, fuzz(2));
        let b = CoarseKey::compute(10.001, 20.001, fuzz(2));
        assert_eq!(a, b);

        let a3 = CoarseKey::compute(10.000, 20.000, fuzz(3));
        let b3 = CoarseKey::compute(10.001, 20.001, fuzz(3));
        assert_ne!(a3, b3);
    }

    #[test]
    fn test_coarse_key_ignores_sum_noise() {
        // 10.01 + 20.02 is not exactly 30.03 in binary floating point
        let a = CoarseKey::compute(10.01, 20.02, fuzz(2));
        let b = CoarseKey::compute(10.02, 20.01, fuzz(2));
        let c = CoarseKey::compute(10.00, 20.03, fuzz(2));
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_checksum_is_adler32_of_rounded_sum() {
        // zlib.adler32(b"30.00") and zlib.adler32(b"0.8")
        assert_eq!(CoarseKey::compute(10.001, 20.001, fuzz(2)).checksum(), 48103666);
        assert_eq!(CoarseKey::compute(0.4, 0.4, fuzz(1)).checksum(), 19333271);
    }

    #[test]
    fn test_checksum_collision_does_not_merge_keys() {
        // "0.131" and "0.212" share an Adler-32 value
        let a = CoarseKey::compute(0.131, 0.0, fuzz(3));
        let b = CoarseKey::compute(0.212, 0.0, fuzz(3));
        assert_eq!(a.checksum(), b.checksum());
        assert_ne!(a, b);
    }

    #[test]
    fn test_coarse_key_signed_zero() {
        let a = CoarseKey::compute(-0.001, -0.001, fuzz(2));
        let b = CoarseKey::compute(0.001, 0.001, fuzz(2));
        assert_eq!(a, b);
    }

    #[test]
    fn test_record_sighting() {
        let mut obs = Observation::new(1.0, 1.0, "2020-08-21", "1200", "n", fuzz(2)).unwrap();
        obs.record_sighting();
        obs.record_sighting();
        assert_eq!(obs.seen_count(), 3);
    }
}
