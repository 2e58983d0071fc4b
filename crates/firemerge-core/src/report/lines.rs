use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{FireError, Result};
use crate::models::FireCluster;

#[derive(Serialize)]
struct Line<'a> {
    lat: f64,
    lon: f64,
    date: &'a str,
    time: &'a str,
    confidence: &'a str,
    seen_count: usize,
    hash: u32,
}

/// Render one cluster as a single-line JSON object.
pub fn to_line(cluster: &FireCluster) -> Result<String> {
    let obs = &cluster.representative;
    let line = Line {
        lat: obs.latitude(),
        lon: obs.longitude(),
        date: obs.acquisition_date(),
        time: obs.acquisition_time(),
        confidence: obs.confidence(),
        seen_count: cluster.member_count(),
        hash: obs.coarse_key().checksum(),
    };
    serde_json::to_string(&line).map_err(|e| FireError::Serialization(e.to_string()))
}

/// Write one line per cluster to `path`.
pub fn write_lines(clusters: &[FireCluster], path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for cluster in clusters {
        writeln!(writer, "{}", to_line(cluster)?)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::{ClusteringEngine, GroupingStrategy};
    use crate::models::{Fuzziness, Observation};

    #[test]
    fn test_line_fields() {
        let input = vec![
            Observation::new(-8.5, 115.2, "2021-01-02", "0130", "82", Fuzziness::default()).unwrap(),
            Observation::new(-8.5, 115.2, "2021-01-03", "0130", "90", Fuzziness::default()).unwrap(),
        ];
        let outcome = ClusteringEngine::new(GroupingStrategy::default()).unwrap().cluster(input);
        let line = to_line(&outcome.clusters[0]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["lat"], -8.5);
        assert_eq!(value["lon"], 115.2);
        assert_eq!(value["date"], "2021-01-02");
        assert_eq!(value["time"], "0130");
        assert_eq!(value["confidence"], "82");
        assert_eq!(value["seen_count"], 2);
        // zlib.adler32(b"106.70")
        assert_eq!(value["hash"], 68944173);
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_write_lines() {
        let input = vec![
            Observation::new(1.0, 1.0, "2021-01-02", "0130", "n", Fuzziness::default()).unwrap(),
            Observation::new(5.0, 5.0, "2021-01-02", "0130", "n", Fuzziness::default()).unwrap(),
        ];
        let outcome = ClusteringEngine::new(GroupingStrategy::default()).unwrap().cluster(input);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fires.txt");
        write_lines(&outcome.clusters, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
