use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use std::fs;
use std::path::Path;

use crate::error::{FireError, Result};
use crate::models::FireCluster;

/// One point feature per cluster.
///
/// The geometry is a MultiPoint holding a single `[lat, lon]` position;
/// latitude comes first, which is the order the map layers consuming these
/// files were built against.
pub fn to_feature(cluster: &FireCluster) -> Feature {
    let obs = &cluster.representative;
    let geometry = Geometry::new(Value::MultiPoint(vec![vec![obs.latitude(), obs.longitude()]]));

    let mut properties = JsonObject::new();
    properties.insert("LATITUDE".to_string(), obs.latitude().into());
    properties.insert("LONGITUDE".to_string(), obs.longitude().into());
    properties.insert("ACQ_DATE".to_string(), obs.acquisition_date().into());
    properties.insert("ACQ_TIME".to_string(), obs.acquisition_time().into());
    properties.insert("SEEN_COUNT".to_string(), cluster.member_count().into());

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn to_feature_collection(clusters: &[FireCluster]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: clusters.iter().map(to_feature).collect(),
        foreign_members: None,
    }
}

/// Write the clusters as a pretty-printed feature collection.
pub fn write_feature_collection(clusters: &[FireCluster], path: &Path) -> Result<()> {
    let collection = to_feature_collection(clusters);
    let json = serde_json::to_string_pretty(&collection)
        .map_err(|e| FireError::Serialization(format!("Failed to serialize GeoJSON: {}", e)))?;
    fs::write(path, json)?;
    Ok(())
}
