//! Integration tests for the registry build pipeline.
//!
//! These tests assemble a content root in a temp directory and verify the
//! end-to-end behavior: validation, shape loading, strategy construction and
//! client-config rendering.

mod common;

use common::test_data;

use humboldt::registry::DatasetRegistry;
use humboldt::shape_loader::load_shape_file;
use humboldt::validation::missing_files;
use humboldt::{projection, DeclarationTable, HumboldtError, SourceKind};

#[test]
fn missing_custom_raster_yields_no_entry() {
    let dir = tempfile::tempdir().unwrap();
    test_data::write_square_geojson(&dir.path().join("outline.geojson"), 42.0, -75.0, 0.02, None);

    let mut table = DeclarationTable::new();
    table.insert(
        "ghost".to_string(),
        test_data::custom_declaration("tiles/ghost.tif", &[("Outline", "outline.geojson")]),
    );

    let registry = DatasetRegistry::build(&table, dir.path()).unwrap();
    assert!(!registry.contains("ghost"));
    assert!(registry.is_empty());

    // The validator attributes exactly the raster gap to this dataset
    let missing = missing_files("ghost", &table["ghost"], dir.path());
    assert_eq!(missing.len(), 1);
    match &missing[0] {
        HumboldtError::MissingFile { dataset, path } => {
            assert_eq!(dataset, "ghost");
            assert!(path.ends_with("tiles/ghost.tif"));
        }
        other => panic!("Expected MissingFile, got {other:?}"),
    }
}

#[test]
fn one_absent_shape_layer_excludes_the_whole_dataset() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["states", "districts", "townships"] {
        test_data::write_square_geojson(
            &dir.path().join(format!("{name}.geojson")),
            16.66,
            96.33,
            0.02,
            None,
        );
    }
    std::fs::write(dir.path().join("data.tif"), "").unwrap();

    let decl = test_data::custom_declaration(
        "data.tif",
        &[
            ("States", "states.geojson"),
            ("Districts", "districts.geojson"),
            ("Townships", "townships.geojson"),
            ("Wards", "wards.geojson"),
        ],
    );

    // Exactly one missing file across the four layers
    let missing = missing_files("partial", &decl, dir.path());
    assert_eq!(missing.len(), 1);
    match &missing[0] {
        HumboldtError::MissingFile { dataset, path } => {
            assert_eq!(dataset, "partial");
            assert!(path.ends_with("wards.geojson"));
        }
        other => panic!("Expected MissingFile, got {other:?}"),
    }

    // The three present files load fine on their own
    for name in ["states", "districts", "townships"] {
        let loaded = load_shape_file(&dir.path().join(format!("{name}.geojson"))).unwrap();
        assert_eq!(loaded.geometries.len(), 1);
    }

    // But the dataset as a whole is excluded
    let mut table = DeclarationTable::new();
    table.insert("partial".to_string(), decl);
    let registry = DatasetRegistry::build(&table, dir.path()).unwrap();
    assert!(!registry.contains("partial"));
}

#[test]
fn unloadable_dataset_does_not_block_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    test_data::write_square_geojson(&dir.path().join("good.geojson"), 42.0, -75.0, 0.02, None);
    std::fs::write(dir.path().join("good.tif"), "").unwrap();

    let mut table = DeclarationTable::new();
    table.insert("basemap".to_string(), test_data::basemap_declaration());
    table.insert("catalog".to_string(), test_data::catalog_declaration(&[]));
    table.insert(
        "good".to_string(),
        test_data::custom_declaration("good.tif", &[("Outline", "good.geojson")]),
    );
    table.insert(
        "broken".to_string(),
        test_data::custom_declaration("absent.tif", &[("Outline", "good.geojson")]),
    );

    let registry = DatasetRegistry::build(&table, dir.path()).unwrap();
    assert_eq!(
        registry.keys().collect::<Vec<_>>(),
        vec!["basemap", "catalog", "good"]
    );

    // No partial entries are ever exposed
    assert!(registry.get("broken").is_none());
}

#[test]
fn upstate_new_york_square_gets_zone_18_north_and_a_faithful_area() {
    let dir = tempfile::tempdir().unwrap();
    let shape_path = dir.path().join("outline.geojson");
    test_data::write_square_geojson(&shape_path, 42.0, -75.0, 0.02, None);

    assert_eq!(projection::utm_zone_number(42.0, -75.0), 18);
    assert_eq!(
        projection::utm_proj_string(42.0, -75.0),
        "+proj=utm +zone=18 +north +datum=WGS84 +units=m +no_defs"
    );

    let loaded = load_shape_file(&shape_path).unwrap();
    assert_eq!(loaded.geometries.len(), loaded.areas_km2.len());

    let expected = test_data::planar_square_area_km2(42.0, 0.02);
    let got = loaded.areas_km2[0];
    let rel = (got - expected).abs() / expected;
    assert!(rel < 0.01, "area {got} vs estimate {expected} (rel {rel})");
}

#[test]
fn area_is_invariant_across_equivalent_crs_encodings() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.geojson");
    let b = dir.path().join("b.geojson");
    test_data::write_square_geojson(&a, 10.68, 106.75, 0.02, Some("EPSG:4326"));
    test_data::write_square_geojson(&b, 10.68, 106.75, 0.02, Some("urn:ogc:def:crs:OGC:1.3:CRS84"));

    let la = load_shape_file(&a).unwrap();
    let lb = load_shape_file(&b).unwrap();
    let rel = (la.areas_km2[0] - lb.areas_km2[0]).abs() / la.areas_km2[0];
    assert!(rel < 0.01, "{} vs {}", la.areas_km2[0], lb.areas_km2[0]);
}

#[test]
fn bad_geometry_excludes_only_its_dataset() {
    let dir = tempfile::tempdir().unwrap();
    test_data::write_point_geojson(&dir.path().join("points.geojson"));
    std::fs::write(dir.path().join("data.tif"), "").unwrap();

    let mut table = DeclarationTable::new();
    table.insert("basemap".to_string(), test_data::basemap_declaration());
    table.insert(
        "bad_geom".to_string(),
        test_data::custom_declaration("data.tif", &[("Points", "points.geojson")]),
    );

    let registry = DatasetRegistry::build(&table, dir.path()).unwrap();
    assert!(!registry.contains("bad_geom"));
    assert!(registry.contains("basemap"));
}

#[test]
fn entries_expose_strategy_shapes_and_client_config() {
    let dir = tempfile::tempdir().unwrap();
    test_data::write_square_geojson(&dir.path().join("grid.geojson"), 42.0, -75.0, 0.02, None);
    std::fs::write(dir.path().join("imagery.tif"), "").unwrap();

    let mut table = DeclarationTable::new();
    table.insert("basemap".to_string(), test_data::basemap_declaration());
    table.insert(
        "custom".to_string(),
        test_data::custom_declaration("imagery.tif", &[("Grid", "grid.geojson")]),
    );

    let registry = DatasetRegistry::build(&table, dir.path()).unwrap();

    let basemap = registry.get("basemap").unwrap();
    assert_eq!(basemap.source.kind(), SourceKind::RemoteBasemap);
    assert!(!basemap.source.supports_export());
    assert!(basemap.shape_layers.is_empty());
    // No shape layers renders as a null literal, never an empty list
    assert!(basemap.client_config.contains(r#""shapes": null"#));
    assert!(basemap.client_config.contains(r#""tms":false"#));

    let custom = registry.get("custom").unwrap();
    assert_eq!(custom.source.kind(), SourceKind::CustomRaster);
    let grid = &custom.shape_layers["Grid"];
    assert_eq!(grid.geometries.len(), grid.areas_km2.len());
    assert_eq!(grid.crs, "EPSG:4326");
    assert!(custom.client_config.contains(r#""tms":true"#));
    assert!(custom.client_config.contains(r#""zone_name_key":null"#));
    assert!(!custom.client_config.contains("True"));
    assert!(!custom.client_config.contains("None"));
}

#[test]
fn builtin_table_against_an_empty_root_keeps_only_fileless_datasets() {
    // Basemap and catalog datasets without shape layers reference no files,
    // so they load even from an empty content root; everything else drops.
    let dir = tempfile::tempdir().unwrap();
    let table = humboldt::declarations::builtin();
    let registry = DatasetRegistry::build(&table, dir.path()).unwrap();

    let keys: Vec<&str> = registry.keys().collect();
    assert_eq!(
        keys,
        vec!["chesapeake", "esri_world_imagery", "esri_world_imagery_naip"]
    );
}
