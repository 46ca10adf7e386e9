//! End-to-end tests: manifest → sub-grids → disjoint attributed partition.
//!
//! Run with: `cargo test --test partition_integration`

use std::collections::HashSet;
use std::fs;

use geo::{Area, BooleanOps};
use tempfile::TempDir;

use gridfuse::config::ConfigFile;
use gridfuse::footprint::{
    AssetManifest, AssetSpec, Bounds, GridShape, InMemoryBoundsReader, RasterBounds,
};
use gridfuse::overlay::GeoOverlay;
use gridfuse::partition::{write_geojson, write_join_table, Partition, Region};
use gridfuse::pipeline::{PartitionPipeline, PipelineError};

// ============================================================================
// Test Helpers
// ============================================================================

fn reader(assets: &[(&str, [f64; 4])]) -> InMemoryBoundsReader {
    assets.iter().fold(InMemoryBoundsReader::new(), |r, (url, b)| {
        r.with(*url, RasterBounds::new(Bounds::from(*b), "EPSG:4326"))
    })
}

fn specs(urls: &[&str], grid: GridShape) -> Vec<AssetSpec> {
    urls.iter().map(|url| AssetSpec::new(*url, grid)).collect()
}

fn pipeline() -> PartitionPipeline {
    PartitionPipeline::new(GeoOverlay::default()).with_expected_crs("EPSG:4326")
}

fn source_urls(region: &Region) -> Vec<&str> {
    region.sources.iter().map(|s| s.asset_url.as_str()).collect()
}

fn assert_disjoint(partition: &Partition) {
    for (i, a) in partition.regions.iter().enumerate() {
        for b in &partition.regions[i + 1..] {
            let shared = a.geometry.intersection(&b.geometry).unsigned_area();
            assert!(
                shared < 1e-6,
                "regions {} and {} share area {}",
                a.id,
                b.id,
                shared
            );
        }
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_two_overlapping_squares() {
    let reader = reader(&[("a.tif", [0.0, 0.0, 2.0, 2.0]), ("b.tif", [1.0, 1.0, 3.0, 3.0])]);
    let report = pipeline()
        .run(&specs(&["a.tif", "b.tif"], GridShape::new(1, 1)), &reader)
        .unwrap();
    let partition = &report.partition;

    assert!(partition.complete);
    assert_eq!(partition.len(), 3);
    assert!((partition.total_area() - 7.0).abs() < 1e-9);
    assert_disjoint(partition);

    let mut attributions: Vec<Vec<&str>> = partition.regions.iter().map(source_urls).collect();
    attributions.sort();
    assert_eq!(
        attributions,
        vec![vec!["a.tif"], vec!["a.tif", "b.tif"], vec!["b.tif"]]
    );

    let shared = partition
        .regions
        .iter()
        .find(|r| r.is_shared())
        .unwrap();
    assert!((shared.area() - 1.0).abs() < 1e-9);
    assert!(shared.sources.iter().all(|s| s.sub_id == "0_0_0"));
}

#[test]
fn test_hundred_cell_grid_converges_in_one_round() {
    let reader = reader(&[("grid.tif", [0.0, 0.0, 10.0, 10.0])]);
    let report = pipeline()
        .run(&specs(&["grid.tif"], GridShape::new(10, 10)), &reader)
        .unwrap();

    assert_eq!(report.stats.grid_cells, 100);
    assert_eq!(report.partition.len(), 100);
    assert_eq!(report.partition.rounds, 1);
    assert!(report.partition.complete);

    let sub_ids: HashSet<&str> = report
        .partition
        .regions
        .iter()
        .map(|r| {
            assert_eq!(r.sources.len(), 1);
            r.sources[0].sub_id.as_str()
        })
        .collect();
    assert_eq!(sub_ids.len(), 100);
    assert!(sub_ids.contains("9_9_0"));
}

#[test]
fn test_antimeridian_cell_is_split_in_two() {
    let reader = reader(&[("dateline.tif", [170.0, 0.0, 190.0, 10.0])]);
    let report = pipeline()
        .run(&specs(&["dateline.tif"], GridShape::new(1, 1)), &reader)
        .unwrap();

    assert_eq!(report.stats.grid_cells, 1);
    assert_eq!(report.stats.split_cells, 2);
    assert_eq!(report.partition.len(), 2);
    assert!((report.partition.total_area() - 200.0).abs() < 1e-9);

    let mut halves: Vec<(String, [f64; 4])> = report
        .partition
        .regions
        .iter()
        .map(|r| (r.sources[0].sub_id.clone(), r.sources[0].sub_bounds.as_array()))
        .collect();
    halves.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(
        halves,
        vec![
            ("0_0_0".to_string(), [170.0, 0.0, 180.0, 10.0]),
            ("0_0_1".to_string(), [180.0, 0.0, 190.0, 10.0]),
        ]
    );
}

#[test]
fn test_split_half_and_wrapped_cell_share_a_frame() {
    // The east half of the split cell and the already-wrapped cell are both in
    // the 180..360 frame, so their overlap is resolved and attributed to both.
    let reader = reader(&[
        ("dateline.tif", [170.0, 0.0, 190.0, 10.0]),
        ("wrapped.tif", [182.0, 2.0, 186.0, 8.0]),
    ]);
    let report = pipeline()
        .run(&specs(&["dateline.tif", "wrapped.tif"], GridShape::new(1, 1)), &reader)
        .unwrap();
    let partition = &report.partition;

    assert!(partition.complete);
    assert_disjoint(partition);
    assert!((partition.total_area() - 200.0).abs() < 1e-9);

    let shared: Vec<&Region> = partition.regions.iter().filter(|r| r.is_shared()).collect();
    assert_eq!(shared.len(), 1);
    assert_eq!(source_urls(shared[0]), vec!["dateline.tif", "wrapped.tif"]);
    assert!((shared[0].area() - 24.0).abs() < 1e-9);
}

#[test]
fn test_native_frame_cell_is_not_unified_with_wrapped_equivalent() {
    // -178..-174 and 182..186 are the same ground area in different frames.
    // Frames are not reconciled, so both remain separate regions.
    let reader = reader(&[
        ("wrapped.tif", [182.0, 2.0, 186.0, 8.0]),
        ("native.tif", [-178.0, 2.0, -174.0, 8.0]),
    ]);
    let report = pipeline()
        .run(&specs(&["wrapped.tif", "native.tif"], GridShape::new(1, 1)), &reader)
        .unwrap();

    assert_eq!(report.partition.len(), 2);
    assert!(report.partition.regions.iter().all(|r| !r.is_shared()));
    assert!((report.partition.total_area() - 48.0).abs() < 1e-9);
}

#[test]
fn test_unreadable_asset_does_not_affect_others() {
    let readable = reader(&[("a.tif", [0.0, 0.0, 2.0, 2.0]), ("b.tif", [1.0, 1.0, 3.0, 3.0])]);
    let with_missing = pipeline()
        .run(
            &specs(&["a.tif", "missing.tif", "b.tif"], GridShape::new(2, 2)),
            &readable,
        )
        .unwrap();
    let without = pipeline()
        .run(&specs(&["a.tif", "b.tif"], GridShape::new(2, 2)), &readable)
        .unwrap();

    assert_eq!(with_missing.asset_errors.len(), 1);
    assert_eq!(with_missing.asset_errors[0].url(), Some("missing.tif"));
    assert_eq!(with_missing.partition, without.partition);
}

#[test]
fn test_fractional_grid_edges_conserve_area() {
    let reader = reader(&[("a.tif", [0.0, 0.0, 1.0, 1.0]), ("b.tif", [0.5, 0.5, 1.5, 1.5])]);
    let report = pipeline()
        .run(&specs(&["a.tif", "b.tif"], GridShape::new(3, 3)), &reader)
        .unwrap();

    assert!(report.partition.complete);
    assert_disjoint(&report.partition);
    assert!((report.partition.total_area() - 1.75).abs() < 1e-4);
    assert!(report.partition.regions.iter().all(|r| !r.sources.is_empty()));
}

#[test]
fn test_web_mercator_assets() {
    let (x0, y0) = (1.0e7, 5.0e6);
    let reader = InMemoryBoundsReader::new()
        .with(
            "west.tif",
            RasterBounds::new(Bounds::new(x0, y0, x0 + 1000.0, y0 + 1000.0), "EPSG:3857"),
        )
        .with(
            "east.tif",
            RasterBounds::new(
                Bounds::new(x0 + 250.0, y0 + 250.0, x0 + 1250.0, y0 + 1250.0),
                "EPSG:3857",
            ),
        );
    let assets = specs(&["west.tif", "east.tif"], GridShape::new(2, 2));

    let mut config = ConfigFile::default();
    config.input.crs = "EPSG:3857".to_string();
    config.resolver.snap_decimals = 9;
    let too_fine = PartitionPipeline::from_config(&config).run(&assets, &reader);
    assert!(matches!(
        too_fine,
        Err(PipelineError::SnapRangeExceeded { cells: 8 })
    ));

    config.resolver.snap_decimals = 3;
    let report = PartitionPipeline::from_config(&config)
        .run(&assets, &reader)
        .unwrap();
    let partition = &report.partition;
    assert!(partition.complete);
    assert_eq!(report.stats.dropped_cells, 0);
    assert_disjoint(partition);
    let expected = 2.0e6 - 750.0 * 750.0;
    assert!((partition.total_area() - expected).abs() / expected < 1e-9);
    assert!(partition.regions.iter().all(|r| !r.sources.is_empty()));
}

#[test]
fn test_budget_exhaustion_is_visible() {
    let reader = reader(&[("a.tif", [0.0, 0.0, 2.0, 2.0]), ("b.tif", [1.0, 1.0, 3.0, 3.0])]);
    let assets = specs(&["a.tif", "b.tif"], GridShape::new(1, 1));

    let report = pipeline().with_max_rounds(1).run(&assets, &reader).unwrap();
    assert!(!report.partition.complete);
    assert!(report.stats.unresolved > 0);

    let strict = pipeline()
        .with_max_rounds(1)
        .with_fail_on_incomplete(true)
        .run(&assets, &reader);
    assert!(matches!(
        strict,
        Err(PipelineError::IterationBudgetExceeded { .. })
    ));
}

#[test]
fn test_manifest_to_geojson() {
    let temp = TempDir::new().unwrap();
    let manifest_path = temp.path().join("assets.json");
    fs::write(
        &manifest_path,
        r#"{
            "assets": [
                { "url": "a.tif", "bounds": [0, 0, 2, 2], "grid": [1, 1] },
                { "url": "b.tif", "bounds": [1, 1, 3, 3], "grid": [1, 1] },
                { "url": "c.tif" }
            ]
        }"#,
    )
    .unwrap();

    let config = ConfigFile::default();
    let (assets, reader) = AssetManifest::load_from(&manifest_path)
        .unwrap()
        .into_parts(config.grid.shape(), &config.input.crs);
    let report = PartitionPipeline::from_config(&config)
        .run(&assets, &reader)
        .unwrap();
    assert_eq!(report.asset_errors.len(), 1);

    let geojson_path = temp.path().join("out").join("partition.geojson");
    let join_path = temp.path().join("out").join("join.json");
    write_geojson(&report.partition, &geojson_path).unwrap();
    write_join_table(&report.partition, &join_path).unwrap();

    let geojson: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&geojson_path).unwrap()).unwrap();
    let features = geojson["features"].as_array().unwrap();
    assert_eq!(features.len(), 3);
    let shared = features
        .iter()
        .find(|f| f["properties"]["url"].as_array().unwrap().len() == 2)
        .unwrap();
    assert_eq!(shared["properties"]["fused_sub_id"][0], "0_0_0");

    let rows: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&join_path).unwrap()).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 4);
}
