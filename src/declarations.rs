//! The dataset declaration table.
//!
//! A declaration describes everything the registry needs to offer a dataset:
//! display metadata, where raster imagery comes from, which boundary files to
//! load, and the default map viewport. Declarations are static, authored
//! values; the loading pipeline never mutates them. The built-in table mirrors
//! the datasets this tool has historically shipped with, and arbitrary tables
//! can be loaded from a JSON file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{HumboldtError, Result};

/// Strategy used to obtain raster imagery for a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SourceKind {
    /// Imagery looked up from a remote tile-service basemap; arbitrary-extent
    /// raster export is not supported.
    RemoteBasemap,
    /// Imagery resolved from the nationwide pre-indexed raster catalog.
    NationwideCatalog,
    /// Imagery read from a single georeferenced raster file.
    CustomRaster,
}

impl SourceKind {
    /// The canonical declaration-table spelling of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::RemoteBasemap => "remote_basemap",
            SourceKind::NationwideCatalog => "nationwide_catalog",
            SourceKind::CustomRaster => "custom_raster",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = HumboldtError;

    /// A string that matches no known kind is a declaration-table defect, not
    /// a runtime condition to recover from.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "remote_basemap" => Ok(SourceKind::RemoteBasemap),
            "nationwide_catalog" => Ok(SourceKind::NationwideCatalog),
            "custom_raster" => Ok(SourceKind::CustomRaster),
            other => Err(HumboldtError::UnknownSourceKind {
                kind: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for SourceKind {
    type Error = HumboldtError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<SourceKind> for String {
    fn from(kind: SourceKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Buffer applied around a region of interest during raster extraction.
///
/// The unit is an explicit part of the declaration: remote basemaps pad in
/// decimal degrees, catalog and custom-raster extraction pads in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Padding {
    /// Geographic buffer in decimal degrees.
    Degrees(f64),
    /// Metric buffer in meters.
    Meters(f64),
}

impl Padding {
    /// The numeric magnitude, unit disregarded.
    pub fn value(&self) -> f64 {
        match self {
            Padding::Degrees(v) | Padding::Meters(v) => *v,
        }
    }
}

/// Rendering parameters for the client-side tile layer.
///
/// Serializes with the client's camelCase key convention; optional values
/// render as `null` rather than being omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayerOptions {
    /// Tile URL template with `{z}/{x}/{y}` placeholders
    pub url: String,
    /// Minimum zoom level
    pub min_zoom: u8,
    /// Maximum zoom level
    pub max_zoom: u8,
    /// Zoom level beyond which tiles are upscaled rather than fetched
    pub max_native_zoom: Option<u8>,
    /// Attribution line shown on the map
    pub attribution: String,
    /// Whether the tile source uses the TMS y-axis convention
    #[serde(default)]
    pub tms: bool,
}

/// Default map viewport for a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Initial map center as `[lat, lon]`
    pub center: [f64; 2],
    /// Initial zoom level
    pub initial_zoom: u8,
    /// Optional bounding box as `[[lat, lon], [lat, lon]]`
    #[serde(default)]
    pub bounds: Option<[[f64; 2]; 2]>,
}

/// A named boundary-file reference belonging to a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeLayerDeclaration {
    /// Display name of the layer (e.g. "Districts")
    pub name: String,
    /// Boundary file path, relative to the content root
    pub shapes_fn: PathBuf,
    /// Attribute key labelling each zone; `None` means zones are unnamed
    pub zone_name_key: Option<String>,
}

/// An immutable, authored dataset specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDeclaration {
    /// Display name
    pub name: String,
    /// Label describing where the imagery comes from
    pub imagery_metadata: String,
    /// How raster imagery is sourced
    pub source_kind: SourceKind,
    /// Tile-service URL template (remote basemap only)
    #[serde(default)]
    pub data_url: Option<String>,
    /// Raster file path relative to the content root (custom raster only)
    #[serde(default)]
    pub data_fn: Option<PathBuf>,
    /// Extraction padding with an explicit unit
    pub padding: Padding,
    /// Client tile-layer rendering parameters
    pub tile_layer: TileLayerOptions,
    /// Boundary layers to load, if any
    #[serde(default)]
    pub shape_layers: Option<Vec<ShapeLayerDeclaration>>,
    /// Default map viewport
    pub location: Viewport,
}

/// An ordered dataset key → declaration table.
pub type DeclarationTable = BTreeMap<String, DatasetDeclaration>;

/// Load a declaration table from a JSON file.
///
/// An unrecognized source kind in the file fails the whole load with
/// [`HumboldtError::UnknownSourceKind`].
pub fn from_file(path: &Path) -> Result<DeclarationTable> {
    let content = std::fs::read_to_string(path)?;
    let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(&content)?;

    // Parse each kind up front so an unknown spelling surfaces as the
    // domain error rather than being buried in a serde message.
    let mut table = DeclarationTable::new();
    for (key, value) in raw {
        if let Some(kind) = value.get("source_kind").and_then(serde_json::Value::as_str) {
            kind.parse::<SourceKind>()?;
        }
        let decl: DatasetDeclaration = serde_json::from_value(value)?;
        table.insert(key, decl);
    }
    Ok(table)
}

const ESRI_WORLD_IMAGERY_URL: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";
const ESRI_ATTRIBUTION: &str = "Tiles &copy; Esri &mdash; Source: Esri, i-cubed, USDA, USGS, AEX, \
     GeoEye, Getmapping, Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community";

fn shape_layer(name: &str, shapes_fn: &str, zone_name_key: Option<&str>) -> ShapeLayerDeclaration {
    ShapeLayerDeclaration {
        name: name.to_string(),
        shapes_fn: PathBuf::from(shapes_fn),
        zone_name_key: zone_name_key.map(str::to_string),
    }
}

/// The built-in declaration table.
///
/// Keys correspond to entries in the client's tile-layer index; each
/// declaration pairs a raster source with the boundary files valid for it.
pub fn builtin() -> DeclarationTable {
    let mut table = DeclarationTable::new();

    table.insert(
        "esri_world_imagery".to_string(),
        DatasetDeclaration {
            name: "ESRI World Imagery".to_string(),
            imagery_metadata: "ESRI World Imagery".to_string(),
            source_kind: SourceKind::RemoteBasemap,
            data_url: Some(ESRI_WORLD_IMAGERY_URL.to_string()),
            data_fn: None,
            padding: Padding::Degrees(0.0005),
            tile_layer: TileLayerOptions {
                url: ESRI_WORLD_IMAGERY_URL.to_string(),
                min_zoom: 4,
                max_zoom: 20,
                max_native_zoom: None,
                attribution: ESRI_ATTRIBUTION.to_string(),
                tms: false,
            },
            shape_layers: None,
            location: Viewport {
                center: [38.0, -88.0],
                initial_zoom: 4,
                bounds: None,
            },
        },
    );

    table.insert(
        "esri_world_imagery_naip".to_string(),
        DatasetDeclaration {
            name: "ESRI World Imagery".to_string(),
            imagery_metadata: "ESRI World Imagery".to_string(),
            source_kind: SourceKind::NationwideCatalog,
            data_url: None,
            data_fn: None,
            padding: Padding::Meters(20.0),
            tile_layer: TileLayerOptions {
                url: ESRI_WORLD_IMAGERY_URL.to_string(),
                min_zoom: 4,
                max_zoom: 20,
                max_native_zoom: None,
                attribution: ESRI_ATTRIBUTION.to_string(),
                tms: false,
            },
            shape_layers: None,
            location: Viewport {
                center: [38.0, -88.0],
                initial_zoom: 4,
                bounds: None,
            },
        },
    );

    table.insert(
        "user_study_5".to_string(),
        DatasetDeclaration {
            name: "User Study Area 5".to_string(),
            imagery_metadata: "NAIP Imagery".to_string(),
            source_kind: SourceKind::CustomRaster,
            data_url: None,
            data_fn: Some(PathBuf::from("tiles/user_study_5.tif")),
            padding: Padding::Meters(20.0),
            tile_layer: TileLayerOptions {
                url: "tiles/user_study_5/{z}/{x}/{y}.png".to_string(),
                min_zoom: 13,
                max_zoom: 20,
                max_native_zoom: Some(18),
                attribution: "Georeferenced Image".to_string(),
                tms: true,
            },
            shape_layers: Some(vec![shape_layer(
                "Area boundary",
                "shapes/user_study_5_outline.geojson",
                None,
            )]),
            location: Viewport {
                center: [42.448269618302362, -75.110429001207137],
                initial_zoom: 13,
                bounds: None,
            },
        },
    );

    table.insert(
        "yangon_sentinel".to_string(),
        DatasetDeclaration {
            name: "Yangon, Myanmar".to_string(),
            imagery_metadata: "Sentinel Imagery".to_string(),
            source_kind: SourceKind::CustomRaster,
            data_url: None,
            data_fn: Some(PathBuf::from("tiles/yangon.tif")),
            padding: Padding::Meters(1100.0),
            tile_layer: TileLayerOptions {
                url: "tiles/yangon/{z}/{x}/{y}.png".to_string(),
                min_zoom: 10,
                max_zoom: 20,
                max_native_zoom: Some(16),
                attribution: "Georeferenced Image".to_string(),
                tms: true,
            },
            shape_layers: Some(vec![
                shape_layer(
                    "States",
                    "shapes/yangon_sentinel_admin_1_clipped.geojson",
                    Some("ST"),
                ),
                shape_layer(
                    "Districts",
                    "shapes/yangon_sentinel_admin_2_clipped.geojson",
                    Some("DT"),
                ),
                shape_layer(
                    "Townships",
                    "shapes/yangon_sentinel_admin_3_clipped.geojson",
                    Some("TS"),
                ),
                shape_layer(
                    "Wards",
                    "shapes/yangon_sentinel_admin_4_clipped.geojson",
                    Some("Ward"),
                ),
            ]),
            location: Viewport {
                center: [16.66177, 96.326427],
                initial_zoom: 10,
                bounds: None,
            },
        },
    );

    table.insert(
        "hcmc_sentinel".to_string(),
        DatasetDeclaration {
            name: "Hồ Chí Minh City, Vietnam".to_string(),
            imagery_metadata: "Sentinel Imagery".to_string(),
            source_kind: SourceKind::CustomRaster,
            data_url: None,
            data_fn: Some(PathBuf::from("tiles/hcmc_sentinel.tif")),
            padding: Padding::Meters(1100.0),
            tile_layer: TileLayerOptions {
                url: "tiles/hcmc_sentinel_tiles/{z}/{x}/{y}.png".to_string(),
                min_zoom: 10,
                max_zoom: 20,
                max_native_zoom: Some(16),
                attribution: "Georeferenced Image".to_string(),
                tms: true,
            },
            shape_layers: Some(vec![
                shape_layer(
                    "Provinces",
                    "shapes/hcmc_sentinel_admin_1_clipped.geojson",
                    Some("NAME_1"),
                ),
                shape_layer(
                    "Districts",
                    "shapes/hcmc_sentinel_admin_2_clipped.geojson",
                    Some("NAME_2"),
                ),
                shape_layer(
                    "Wards",
                    "shapes/hcmc_sentinel_admin_3_clipped.geojson",
                    Some("NAME_3"),
                ),
            ]),
            location: Viewport {
                center: [10.682, 106.752],
                initial_zoom: 11,
                bounds: None,
            },
        },
    );

    table.insert(
        "yangon_lidar".to_string(),
        DatasetDeclaration {
            name: "Yangon, Myanmar".to_string(),
            imagery_metadata: "LiDAR Imagery".to_string(),
            source_kind: SourceKind::CustomRaster,
            data_url: None,
            data_fn: Some(PathBuf::from("tiles/yangon_lidar.tif")),
            padding: Padding::Meters(20.0),
            tile_layer: TileLayerOptions {
                url: "tiles/yangon_lidar/{z}/{x}/{y}.png".to_string(),
                min_zoom: 10,
                max_zoom: 21,
                max_native_zoom: Some(20),
                attribution: "Georeferenced Image".to_string(),
                tms: true,
            },
            shape_layers: Some(vec![
                shape_layer(
                    "States",
                    "shapes/yangon_lidar_admin_1_clipped.geojson",
                    Some("ST"),
                ),
                shape_layer(
                    "Districts",
                    "shapes/yangon_lidar_admin_2_clipped.geojson",
                    Some("DT"),
                ),
                shape_layer(
                    "Townships",
                    "shapes/yangon_lidar_admin_3_clipped.geojson",
                    Some("TS"),
                ),
                shape_layer(
                    "Wards",
                    "shapes/yangon_lidar_admin_4_clipped.geojson",
                    Some("Ward"),
                ),
            ]),
            location: Viewport {
                center: [16.7870, 96.1450],
                initial_zoom: 15,
                bounds: None,
            },
        },
    );

    table.insert(
        "hcmc_dg".to_string(),
        DatasetDeclaration {
            name: "Thủ Đức District, Hồ Chí Minh City, Vietnam".to_string(),
            imagery_metadata: "Digital Globe Imagery".to_string(),
            source_kind: SourceKind::CustomRaster,
            data_url: None,
            data_fn: Some(PathBuf::from("tiles/HCMC.tif")),
            padding: Padding::Meters(0.0),
            tile_layer: TileLayerOptions {
                url: "tiles/HCMC/{z}/{x}/{y}.png".to_string(),
                min_zoom: 14,
                max_zoom: 21,
                max_native_zoom: Some(18),
                attribution: "Georeferenced Image".to_string(),
                tms: true,
            },
            shape_layers: Some(vec![
                shape_layer(
                    "Provinces",
                    "shapes/hcmc_digital-globe_admin_1_clipped.geojson",
                    Some("NAME_1"),
                ),
                shape_layer(
                    "Districts",
                    "shapes/hcmc_digital-globe_admin_2_clipped.geojson",
                    Some("NAME_2"),
                ),
                shape_layer(
                    "Wards",
                    "shapes/hcmc_digital-globe_admin_3_clipped.geojson",
                    Some("NAME_3"),
                ),
            ]),
            location: Viewport {
                center: [10.838, 106.750],
                initial_zoom: 14,
                bounds: None,
            },
        },
    );

    table.insert(
        "airbus".to_string(),
        DatasetDeclaration {
            name: "Virginia, USA".to_string(),
            imagery_metadata: "Airbus Imagery".to_string(),
            source_kind: SourceKind::CustomRaster,
            data_url: None,
            data_fn: Some(PathBuf::from("tiles/airbus_epsg4326.tif")),
            padding: Padding::Degrees(0.003),
            tile_layer: TileLayerOptions {
                url: "tiles/airbus/{z}/{x}/{y}.png".to_string(),
                min_zoom: 13,
                max_zoom: 21,
                max_native_zoom: Some(18),
                attribution: "Georeferenced Image".to_string(),
                tms: true,
            },
            shape_layers: Some(vec![shape_layer(
                "Grid",
                "shapes/airbus-data-grid-epsg4326.geojson",
                None,
            )]),
            location: Viewport {
                center: [36.80, -76.12],
                initial_zoom: 14,
                bounds: Some([[36.882932, -76.2623637], [36.7298842, -76.0249016]]),
            },
        },
    );

    table.insert(
        "chesapeake".to_string(),
        DatasetDeclaration {
            name: "Maryland, USA".to_string(),
            imagery_metadata: "NAIP Imagery".to_string(),
            source_kind: SourceKind::NationwideCatalog,
            data_url: None,
            data_fn: None,
            padding: Padding::Meters(20.0),
            tile_layer: TileLayerOptions {
                url: "tiles/chesapeake_test/{z}/{x}/{y}.png".to_string(),
                min_zoom: 2,
                max_zoom: 20,
                max_native_zoom: Some(18),
                attribution: "Georeferenced Image".to_string(),
                tms: true,
            },
            shape_layers: None,
            location: Viewport {
                center: [38.11437, -75.99980],
                initial_zoom: 10,
                bounds: None,
            },
        },
    );

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_source_kind_parsing() {
        assert_eq!(
            "remote_basemap".parse::<SourceKind>().unwrap(),
            SourceKind::RemoteBasemap
        );
        assert_eq!(
            "nationwide_catalog".parse::<SourceKind>().unwrap(),
            SourceKind::NationwideCatalog
        );
        assert_eq!(
            "custom_raster".parse::<SourceKind>().unwrap(),
            SourceKind::CustomRaster
        );
    }

    #[test]
    fn test_unknown_source_kind_is_fatal() {
        let err = "esri_world_imagery".parse::<SourceKind>().unwrap_err();
        match err {
            HumboldtError::UnknownSourceKind { kind } => assert_eq!(kind, "esri_world_imagery"),
            other => panic!("Expected UnknownSourceKind, got {:?}", other),
        }
    }

    #[test]
    fn test_builtin_table_shape() {
        let table = builtin();
        assert_eq!(table.len(), 9);

        let basemap = &table["esri_world_imagery"];
        assert_eq!(basemap.source_kind, SourceKind::RemoteBasemap);
        assert!(basemap.data_url.is_some());
        assert!(basemap.shape_layers.is_none());
        assert_eq!(basemap.padding, Padding::Degrees(0.0005));

        let custom = &table["yangon_sentinel"];
        assert_eq!(custom.source_kind, SourceKind::CustomRaster);
        assert_eq!(custom.shape_layers.as_ref().unwrap().len(), 4);
        assert_eq!(custom.padding, Padding::Meters(1100.0));

        let catalog = &table["chesapeake"];
        assert_eq!(catalog.source_kind, SourceKind::NationwideCatalog);
        assert!(catalog.data_fn.is_none());
    }

    #[test]
    fn test_declaration_roundtrip_through_json() {
        let table = builtin();
        let json = serde_json::to_string(&table).unwrap();
        let parsed: DeclarationTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), table.len());
        assert_eq!(
            parsed["user_study_5"].source_kind,
            SourceKind::CustomRaster
        );
    }

    #[test]
    fn test_from_file_rejects_unknown_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datasets.json");
        std::fs::write(
            &path,
            r#"{
                "bad": {
                    "name": "Bad",
                    "imagery_metadata": "Bad",
                    "source_kind": "usa_layer",
                    "padding": {"meters": 20.0},
                    "tile_layer": {
                        "url": "tiles/{z}/{x}/{y}.png",
                        "minZoom": 4,
                        "maxZoom": 20,
                        "maxNativeZoom": null,
                        "attribution": "none"
                    },
                    "location": {"center": [0.0, 0.0], "initialZoom": 4}
                }
            }"#,
        )
        .unwrap();

        let err = from_file(&path).unwrap_err();
        match err {
            HumboldtError::UnknownSourceKind { kind } => assert_eq!(kind, "usa_layer"),
            other => panic!("Expected UnknownSourceKind, got {:?}", other),
        }
    }

    #[test]
    fn test_from_file_loads_valid_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datasets.json");
        std::fs::write(&path, serde_json::to_string(&builtin()).unwrap()).unwrap();

        let table = from_file(&path).unwrap();
        assert_eq!(table.len(), 9);
        assert_eq!(table["chesapeake"].source_kind, SourceKind::NationwideCatalog);
    }
}
