//! Test data generation utilities.
//!
//! Builders for GeoJSON boundary fixtures and dataset declarations with
//! known properties, so integration tests can assemble a content root in a
//! temp directory and build a registry from it.

use std::path::{Path, PathBuf};

use humboldt::{
    DatasetDeclaration, Padding, ShapeLayerDeclaration, SourceKind, TileLayerOptions, Viewport,
};

/// Write a FeatureCollection with one square Polygon of `side_deg` degrees
/// centered on (lat, lon). `crs` adds a legacy crs member when given.
pub fn write_square_geojson(path: &Path, lat: f64, lon: f64, side_deg: f64, crs: Option<&str>) {
    let half = side_deg / 2.0;
    let (w, e) = (lon - half, lon + half);
    let (s, n) = (lat - half, lat + half);
    let crs_member = match crs {
        Some(name) => format!(r#""crs": {{"type": "name", "properties": {{"name": "{name}"}}}}, "#),
        None => String::new(),
    };
    let content = format!(
        r#"{{"type": "FeatureCollection", {crs_member}"features": [{{"type": "Feature", "properties": {{"NAME": "fixture"}}, "geometry": {{"type": "Polygon", "coordinates": [[[{w}, {s}], [{e}, {s}], [{e}, {n}], [{w}, {n}], [{w}, {s}]]]}}}}]}}"#
    );
    std::fs::write(path, content).unwrap();
}

/// Write a FeatureCollection containing a single Point feature, which the
/// shape loader must reject.
pub fn write_point_geojson(path: &Path) {
    std::fs::write(
        path,
        r#"{"type": "FeatureCollection", "features": [{"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}}]}"#,
    )
    .unwrap();
}

/// Planar area estimate in km² for a square of `side_deg` degrees at `lat`,
/// from the standard meters-per-degree series. Independent of the projection
/// code under test.
pub fn planar_square_area_km2(lat: f64, side_deg: f64) -> f64 {
    let phi = lat.to_radians();
    let m_per_deg_lat = 111_132.92 - 559.82 * (2.0 * phi).cos() + 1.175 * (4.0 * phi).cos();
    let m_per_deg_lon = 111_412.84 * phi.cos() - 93.5 * (3.0 * phi).cos();
    (side_deg * m_per_deg_lat) * (side_deg * m_per_deg_lon) / 1_000_000.0
}

fn tile_layer(url: &str) -> TileLayerOptions {
    TileLayerOptions {
        url: url.to_string(),
        min_zoom: 4,
        max_zoom: 20,
        max_native_zoom: Some(18),
        attribution: "Test Fixture".to_string(),
        tms: true,
    }
}

/// A remote-basemap declaration; references no files, so it always loads.
pub fn basemap_declaration() -> DatasetDeclaration {
    DatasetDeclaration {
        name: "Fixture Basemap".to_string(),
        imagery_metadata: "Fixture Imagery".to_string(),
        source_kind: SourceKind::RemoteBasemap,
        data_url: Some("https://tiles.test/{z}/{y}/{x}".to_string()),
        data_fn: None,
        padding: Padding::Degrees(0.0005),
        tile_layer: TileLayerOptions {
            tms: false,
            max_native_zoom: None,
            ..tile_layer("https://tiles.test/{z}/{y}/{x}")
        },
        shape_layers: None,
        location: Viewport {
            center: [38.0, -88.0],
            initial_zoom: 4,
            bounds: None,
        },
    }
}

/// A nationwide-catalog declaration with optional shape layers.
pub fn catalog_declaration(shapes: &[(&str, &str)]) -> DatasetDeclaration {
    DatasetDeclaration {
        name: "Fixture Catalog Area".to_string(),
        imagery_metadata: "Catalog Imagery".to_string(),
        source_kind: SourceKind::NationwideCatalog,
        data_url: None,
        data_fn: None,
        padding: Padding::Meters(20.0),
        tile_layer: tile_layer("tiles/catalog/{z}/{x}/{y}.png"),
        shape_layers: shape_layer_declarations(shapes),
        location: Viewport {
            center: [38.11437, -75.9998],
            initial_zoom: 10,
            bounds: None,
        },
    }
}

/// A custom-raster declaration over `data_fn` with the given shape layers.
pub fn custom_declaration(data_fn: &str, shapes: &[(&str, &str)]) -> DatasetDeclaration {
    DatasetDeclaration {
        name: "Fixture Custom Area".to_string(),
        imagery_metadata: "Custom Imagery".to_string(),
        source_kind: SourceKind::CustomRaster,
        data_url: None,
        data_fn: Some(PathBuf::from(data_fn)),
        padding: Padding::Meters(1100.0),
        tile_layer: tile_layer("tiles/custom/{z}/{x}/{y}.png"),
        shape_layers: shape_layer_declarations(shapes),
        location: Viewport {
            center: [42.0, -75.0],
            initial_zoom: 13,
            bounds: None,
        },
    }
}

fn shape_layer_declarations(shapes: &[(&str, &str)]) -> Option<Vec<ShapeLayerDeclaration>> {
    if shapes.is_empty() {
        return None;
    }
    Some(
        shapes
            .iter()
            .map(|(name, shapes_fn)| ShapeLayerDeclaration {
                name: name.to_string(),
                shapes_fn: PathBuf::from(shapes_fn),
                zone_name_key: None,
            })
            .collect(),
    )
}
