//! GeoJSON and join-table output.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use geo::{LineString, Polygon};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;

use super::types::Partition;

/// Errors writing a partition to disk.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize partition: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn ring_coordinates(ring: &LineString<f64>) -> Value {
    Value::Array(ring.coords().map(|c| json!([c.x, c.y])).collect())
}

/// GeoJSON `Polygon` geometry object.
pub fn polygon_geometry(polygon: &Polygon<f64>) -> Value {
    let rings: Vec<Value> = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(ring_coordinates)
        .collect();
    json!({ "type": "Polygon", "coordinates": rings })
}

/// The partition as a GeoJSON `FeatureCollection`, one feature per region
/// with list-valued `fused_sub_id`, `url` and `sub_bounds` properties.
pub fn to_geojson(partition: &Partition) -> Value {
    let features: Vec<Value> = partition
        .records()
        .iter()
        .map(|record| {
            json!({
                "type": "Feature",
                "geometry": polygon_geometry(&record.geometry),
                "properties": {
                    "region_id": record.region_id,
                    "fused_sub_id": record.fused_sub_id,
                    "url": record.url,
                    "sub_bounds": record.sub_bounds,
                }
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
        "properties": {
            "complete": partition.complete,
            "rounds": partition.rounds,
        }
    })
}

fn write_json(value: &Value, path: &Path) -> Result<(), WriteError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| WriteError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the partition as GeoJSON, creating parent directories as needed.
pub fn write_geojson(partition: &Partition, path: &Path) -> Result<(), WriteError> {
    write_json(&to_geojson(partition), path)?;
    info!(path = %path.display(), regions = partition.len(), "Wrote partition");
    Ok(())
}

/// Write the region → source join table as a JSON array of rows.
pub fn write_join_table(partition: &Partition, path: &Path) -> Result<(), WriteError> {
    let rows = partition.join_table();
    write_json(&serde_json::to_value(&rows)?, path)?;
    info!(path = %path.display(), rows = rows.len(), "Wrote join table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footprint::Bounds;
    use crate::partition::{Region, RegionSourceRow, SourceRef};
    use tempfile::TempDir;

    fn sample() -> Partition {
        Partition {
            regions: vec![Region {
                id: 0,
                geometry: Bounds::new(1.0, 1.0, 2.0, 2.0).to_polygon(),
                sources: vec![
                    SourceRef {
                        asset_url: "a.tif".to_string(),
                        sub_id: "0_0_0".to_string(),
                        sub_bounds: Bounds::new(0.0, 0.0, 2.0, 2.0),
                    },
                    SourceRef {
                        asset_url: "b.tif".to_string(),
                        sub_id: "0_0_0".to_string(),
                        sub_bounds: Bounds::new(1.0, 1.0, 3.0, 3.0),
                    },
                ],
            }],
            complete: true,
            rounds: 2,
        }
    }

    #[test]
    fn test_feature_properties() {
        let value = to_geojson(&sample());
        assert_eq!(value["type"], "FeatureCollection");

        let feature = &value["features"][0];
        assert_eq!(feature["geometry"]["type"], "Polygon");
        assert_eq!(feature["properties"]["url"], json!(["a.tif", "b.tif"]));
        assert_eq!(feature["properties"]["fused_sub_id"], json!(["0_0_0", "0_0_0"]));
        assert_eq!(feature["properties"]["sub_bounds"][1], json!([1.0, 1.0, 3.0, 3.0]));
        assert_eq!(value["properties"]["complete"], true);
    }

    #[test]
    fn test_polygon_rings_are_closed() {
        let geometry = polygon_geometry(&Bounds::new(0.0, 0.0, 1.0, 1.0).to_polygon());
        let ring = geometry["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_write_geojson_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out").join("partition.geojson");

        write_geojson(&sample(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["features"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_write_join_table() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("join.json");

        write_join_table(&sample(), &path).unwrap();

        let rows: Vec<RegionSourceRow> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].asset_url, "b.tif");
    }

    #[test]
    fn test_write_to_directory_fails() {
        let temp = TempDir::new().unwrap();
        let result = write_geojson(&sample(), temp.path());
        assert!(matches!(result, Err(WriteError::Io { .. })));
    }
}
