//! Loading of FIRMS-style detection CSVs
//!
//! Feeds carry 13 fixed columns:
//! `latitude, longitude, bright_ti4, scan, track, acq_date, acq_time,
//! satellite, confidence, version, bright_ti5, frp, daynight`.
//! Only latitude, longitude, acq_date, acq_time and confidence are used.
//! Rows that do not parse (the header row among them) are skipped.

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{FireError, Result};
use crate::geo::BoundingBox;
use crate::models::{Fuzziness, Observation};

/// Number of columns in a detection feed row.
pub const FEED_COLUMNS: usize = 13;

const COL_LATITUDE: usize = 0;
const COL_LONGITUDE: usize = 1;
const COL_ACQ_DATE: usize = 5;
const COL_ACQ_TIME: usize = 6;
const COL_CONFIDENCE: usize = 8;

/// Counters collected while loading
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// CSV files read
    pub files_read: usize,

    /// Rows encountered, header rows included
    pub rows_read: usize,

    /// Rows dropped because they did not parse
    pub rows_skipped: usize,

    /// Rows dropped by the bounding box
    pub rows_outside_region: usize,
}

impl LoadReport {
    /// Rows that became observations.
    pub fn rows_accepted(&self) -> usize {
        self.rows_read - self.rows_skipped - self.rows_outside_region
    }
}

/// Observations loaded from one or more feeds
#[derive(Debug, Clone)]
pub struct LoadedObservations {
    pub observations: Vec<Observation>,
    pub report: LoadReport,
}

enum RowOutcome {
    Accepted(Observation),
    OutsideRegion,
    Skipped(FireError),
}

/// Turns feed rows into [`Observation`]s, optionally restricted to a region.
#[derive(Debug, Clone, Default)]
pub struct ObservationLoader {
    fuzziness: Fuzziness,
    bounding_box: Option<BoundingBox>,
}

impl ObservationLoader {
    pub fn new(fuzziness: Fuzziness) -> Self {
        Self { fuzziness, bounding_box: None }
    }

    /// Keep only rows strictly inside `bbox`.
    pub fn with_bounding_box(mut self, bbox: BoundingBox) -> Self {
        if !bbox.is_satisfiable() {
            tracing::warn!(?bbox, "Bounding box corners are inverted; no rows will match");
        }
        self.bounding_box = Some(bbox);
        self
    }

    pub fn bounding_box(&self) -> Option<&BoundingBox> {
        self.bounding_box.as_ref()
    }

    /// Load every regular file in `dir` as a feed.
    ///
    /// Files are read in file-name order. Subdirectories are ignored.
    pub fn load_directory(&self, dir: &Path) -> Result<LoadedObservations> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut report = LoadReport::default();
        let mut observations = Vec::new();
        for path in &paths {
            let file = File::open(path)?;
            let before = observations.len();
            observations.extend(self.read_csv(file, &mut report)?);
            report.files_read += 1;
            tracing::debug!(
                file = %path.display(),
                observations = observations.len() - before,
                "Loaded feed"
            );
        }

        tracing::info!(
            files = report.files_read,
            accepted = observations.len(),
            skipped = report.rows_skipped,
            outside = report.rows_outside_region,
            "Loaded observations from {}",
            dir.display()
        );

        Ok(LoadedObservations { observations, report })
    }

    /// Read feed rows from any reader, updating `report`.
    pub fn read_csv<R: Read>(&self, reader: R, report: &mut LoadReport) -> Result<Vec<Observation>> {
        let mut rdr = ReaderBuilder::new().has_headers(false).flexible(true).from_reader(reader);

        let mut observations = Vec::new();
        for result in rdr.records() {
            report.rows_read += 1;
            let record = match result {
                Ok(record) => record,
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping unreadable row");
                    report.rows_skipped += 1;
                    continue;
                }
            };

            match self.parse_record(&record) {
                RowOutcome::Accepted(observation) => observations.push(observation),
                RowOutcome::OutsideRegion => report.rows_outside_region += 1,
                RowOutcome::Skipped(e) => {
                    tracing::debug!(error = %e, "Skipping row");
                    report.rows_skipped += 1;
                }
            }
        }

        Ok(observations)
    }

    fn parse_record(&self, record: &StringRecord) -> RowOutcome {
        if record.len() != FEED_COLUMNS {
            return RowOutcome::Skipped(FireError::RowParse {
                reason: format!("expected {} columns, found {}", FEED_COLUMNS, record.len()),
            });
        }

        let (lat, lon) = match (parse_degrees(&record[COL_LATITUDE]), parse_degrees(&record[COL_LONGITUDE])) {
            (Ok(lat), Ok(lon)) => (lat, lon),
            (Err(e), _) | (_, Err(e)) => return RowOutcome::Skipped(e),
        };

        if let Some(bbox) = &self.bounding_box {
            if !bbox.contains(lat, lon) {
                return RowOutcome::OutsideRegion;
            }
        }

        match Observation::new(
            lat,
            lon,
            &record[COL_ACQ_DATE],
            &record[COL_ACQ_TIME],
            record[COL_CONFIDENCE].trim(),
            self.fuzziness,
        ) {
            Ok(observation) => RowOutcome::Accepted(observation),
            Err(e) => RowOutcome::Skipped(e),
        }
    }
}

fn parse_degrees(field: &str) -> Result<f64> {
    field.trim().parse::<f64>().map_err(|e| FireError::RowParse {
        reason: format!("'{}' is not a number: {}", field, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "latitude,longitude,bright_ti4,scan,track,acq_date,acq_time,satellite,confidence,version,bright_ti5,frp,daynight";

    fn row(lat: f64, lon: f64, time: &str) -> String {
        format!("{},{},330.5,0.39,0.36,2020-08-21,{},N,nominal,2.0NRT,290.1,3.2,D", lat, lon, time)
    }

    #[test]
    fn test_header_row_is_skipped() {
        let data = format!("{}\n{}\n{}\n", HEADER, row(10.0, 20.0, "0342"), row(11.0, 21.0, "1205"));
        let mut report = LoadReport::default();
        let obs = ObservationLoader::default().read_csv(data.as_bytes(), &mut report).unwrap();

        assert_eq!(obs.len(), 2);
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.rows_skipped, 1);
        assert_eq!(report.rows_accepted(), 2);
        assert_eq!(obs[0].confidence(), "nominal");
        assert_eq!(obs[1].acquisition_time(), "1205");
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let data = format!(
            "{}\nnot,enough,columns\n{}\n{}\n",
            row(10.0, 20.0, "0342"),
            row(10.0, 20.0, "99xx"),
            row(95.0, 20.0, "0342"),
        );
        let mut report = LoadReport::default();
        let obs = ObservationLoader::default().read_csv(data.as_bytes(), &mut report).unwrap();

        assert_eq!(obs.len(), 1);
        assert_eq!(report.rows_skipped, 3);
    }

    #[test]
    fn test_bounding_box_filter() {
        let data = format!(
            "{}\n{}\n{}\n",
            row(8.5, -80.0, "0100"),
            row(20.0, -80.0, "0100"),
            row(9.61, -80.0, "0100"),
        );
        let loader = ObservationLoader::default().with_bounding_box(BoundingBox::new(7.22, -82.96, 9.61, -77.24));
        let mut report = LoadReport::default();
        let obs = loader.read_csv(data.as_bytes(), &mut report).unwrap();

        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].latitude(), 8.5);
        assert_eq!(report.rows_outside_region, 2);
    }

    #[test]
    fn test_outside_rows_are_not_parsed_further() {
        // bad timestamp outside the box counts as outside, not skipped
        let data = format!("{}\n", row(50.0, 50.0, "garbage"));
        let loader = ObservationLoader::default().with_bounding_box(BoundingBox::new(-1.0, -1.0, 1.0, 1.0));
        let mut report = LoadReport::default();
        loader.read_csv(data.as_bytes(), &mut report).unwrap();

        assert_eq!(report.rows_outside_region, 1);
        assert_eq!(report.rows_skipped, 0);
    }

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b_feed.csv"), format!("{}\n{}\n", HEADER, row(2.0, 2.0, "0200"))).unwrap();
        fs::write(dir.path().join("a_feed.csv"), format!("{}\n{}\n", HEADER, row(1.0, 1.0, "0100"))).unwrap();
        fs::create_dir(dir.path().join("archive")).unwrap();

        let loaded = ObservationLoader::default().load_directory(dir.path()).unwrap();

        assert_eq!(loaded.report.files_read, 2);
        assert_eq!(loaded.observations.len(), 2);
        assert_eq!(loaded.observations[0].latitude(), 1.0);
        assert_eq!(loaded.observations[1].latitude(), 2.0);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ObservationLoader::default().load_directory(&dir.path().join("nope"));
        assert!(matches!(result, Err(FireError::Io(_))));
    }
}
