//! Boundary-file loading.
//!
//! Reads a GeoJSON boundary file, keeps every geometry in its source CRS, and
//! computes a faithful area for each feature by reprojecting a copy into a
//! UTM zone derived from that feature's own representative vertex. Only
//! Polygon and MultiPolygon features are accepted; anything else fails the
//! whole file's load.

use geo::{Area, Contains, Coord, LineString, MultiPolygon, Point, Polygon};
use geojson::GeoJson;
use proj4rs::proj::Proj;
use serde_json::value::Value as JsonValue;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::declarations::ShapeLayerDeclaration;
use crate::error::{HumboldtError, Result};
use crate::projection;

/// A boundary geometry. The Polygon/MultiPolygon-only rule is carried in the
/// type so downstream code never re-checks it.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl ZoneGeometry {
    /// First coordinate of the outer ring (of the first polygon for a
    /// MultiPolygon), as `(lon, lat)`.
    pub fn representative_vertex(&self) -> Option<(f64, f64)> {
        let coord = match self {
            ZoneGeometry::Polygon(p) => p.exterior().0.first(),
            ZoneGeometry::MultiPolygon(mp) => mp.0.first().and_then(|p| p.exterior().0.first()),
        }?;
        Some((coord.x, coord.y))
    }

    /// Point-in-polygon test in the geometry's own CRS.
    pub fn contains_point(&self, point: Point<f64>) -> bool {
        match self {
            ZoneGeometry::Polygon(p) => p.contains(&point),
            ZoneGeometry::MultiPolygon(mp) => mp.contains(&point),
        }
    }
}

/// Result of loading one boundary file.
///
/// `geometries` and `areas_km2` are always the same length and share index
/// correspondence.
#[derive(Debug, Clone)]
pub struct LoadedShapes {
    /// Parsed geometries, still in the source CRS
    pub geometries: Vec<ZoneGeometry>,
    /// Per-feature areas in square kilometers
    pub areas_km2: Vec<f64>,
    /// Source CRS identifier (e.g. `EPSG:4326`)
    pub crs: String,
}

/// A shape layer declaration enriched with its loaded contents.
///
/// Produced as a new value from the raw declaration; the declaration itself
/// is never mutated.
#[derive(Debug, Clone)]
pub struct LoadedShapeLayer {
    /// Display name of the layer
    pub name: String,
    /// Boundary file path as declared (relative to the content root)
    pub shapes_fn: PathBuf,
    /// Attribute key labelling each zone
    pub zone_name_key: Option<String>,
    /// Parsed geometries in the source CRS
    pub geometries: Vec<ZoneGeometry>,
    /// Per-feature areas in square kilometers, index-parallel to `geometries`
    pub areas_km2: Vec<f64>,
    /// Source CRS identifier
    pub crs: String,
}

impl LoadedShapeLayer {
    /// Combine a raw declaration with the contents loaded from its file.
    pub fn new(decl: &ShapeLayerDeclaration, shapes: LoadedShapes) -> Self {
        Self {
            name: decl.name.clone(),
            shapes_fn: decl.shapes_fn.clone(),
            zone_name_key: decl.zone_name_key.clone(),
            geometries: shapes.geometries,
            areas_km2: shapes.areas_km2,
            crs: shapes.crs,
        }
    }
}

/// Load a GeoJSON boundary file.
///
/// Pure function of the input path; the file handle is scoped to this call.
pub fn load_shape_file(path: &Path) -> Result<LoadedShapes> {
    let content = std::fs::read_to_string(path)?;
    let geojson = content.parse::<GeoJson>()?;

    let (geometries, crs_member) = match geojson {
        GeoJson::FeatureCollection(fc) => {
            let crs = crs_from_foreign_members(fc.foreign_members.as_ref());
            (
                fc.features.into_iter().filter_map(|f| f.geometry).collect(),
                crs,
            )
        }
        GeoJson::Feature(f) => {
            let crs = crs_from_foreign_members(f.foreign_members.as_ref());
            (f.geometry.into_iter().collect::<Vec<_>>(), crs)
        }
        GeoJson::Geometry(g) => (vec![g], None),
    };

    // RFC 7946 files carry no crs member; they are CRS84, lon/lat order.
    let crs = crs_member.unwrap_or_else(|| "EPSG:4326".to_string());
    let src_proj_string = projection::resolve_crs(&crs)?;
    let src_proj = projection::make_proj(src_proj_string)?;
    let src_is_geographic = projection::is_geographic(src_proj_string);

    // Zone selection needs geographic degrees; projected sources get their
    // representative vertex transformed to WGS84 first.
    let wgs84 = if src_is_geographic {
        None
    } else {
        Some(projection::make_proj(projection::resolve_crs("EPSG:4326")?)?)
    };

    let mut shapes = Vec::with_capacity(geometries.len());
    let mut areas = Vec::with_capacity(geometries.len());

    for geometry in geometries {
        let type_name = geometry_type_name(&geometry.value);
        let geo_geom: geo::Geometry<f64> = geometry.try_into().map_err(HumboldtError::GeoJson)?;
        let zone_geom = match geo_geom {
            geo::Geometry::Polygon(p) => ZoneGeometry::Polygon(p),
            geo::Geometry::MultiPolygon(mp) => ZoneGeometry::MultiPolygon(mp),
            _ => {
                return Err(HumboldtError::GeometryType {
                    path: path.to_path_buf(),
                    geometry: type_name.to_string(),
                })
            }
        };

        let (lon, lat) =
            zone_geom
                .representative_vertex()
                .ok_or_else(|| HumboldtError::GeometryType {
                    path: path.to_path_buf(),
                    geometry: "Empty".to_string(),
                })?;
        let (lon, lat) = match &wgs84 {
            Some(dst) => {
                // proj4rs hands back radians for a geographic destination
                let (x, y) = projection::transform_point(&src_proj, dst, lon, lat, false)?;
                (x.to_degrees(), y.to_degrees())
            }
            None => (lon, lat),
        };

        // Reproject a copy into the feature's own UTM zone to measure area;
        // the geometry handed back to callers stays in the source CRS.
        let dst_proj = projection::make_proj(&projection::utm_proj_string(lat, lon))?;
        let area_m2 = projected_area(&zone_geom, &src_proj, &dst_proj, src_is_geographic)?;

        areas.push(area_m2 / 1_000_000.0);
        shapes.push(zone_geom);
    }

    debug!(
        path = %path.display(),
        features = shapes.len(),
        crs = %crs,
        "Loaded boundary file"
    );

    Ok(LoadedShapes {
        geometries: shapes,
        areas_km2: areas,
        crs,
    })
}

/// Area of a geometry after reprojection, in square meters.
fn projected_area(
    geom: &ZoneGeometry,
    src: &Proj,
    dst: &Proj,
    src_is_geographic: bool,
) -> Result<f64> {
    let area = match geom {
        ZoneGeometry::Polygon(p) => {
            project_polygon(p, src, dst, src_is_geographic)?.unsigned_area()
        }
        ZoneGeometry::MultiPolygon(mp) => {
            let projected = mp
                .0
                .iter()
                .map(|p| project_polygon(p, src, dst, src_is_geographic))
                .collect::<Result<Vec<_>>>()?;
            MultiPolygon::new(projected).unsigned_area()
        }
    };
    Ok(area)
}

fn project_polygon(
    poly: &Polygon<f64>,
    src: &Proj,
    dst: &Proj,
    src_is_geographic: bool,
) -> Result<Polygon<f64>> {
    let exterior = project_ring(poly.exterior(), src, dst, src_is_geographic)?;
    let interiors = poly
        .interiors()
        .iter()
        .map(|ring| project_ring(ring, src, dst, src_is_geographic))
        .collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn project_ring(
    ring: &LineString<f64>,
    src: &Proj,
    dst: &Proj,
    src_is_geographic: bool,
) -> Result<LineString<f64>> {
    let coords = ring
        .coords()
        .map(|c| {
            projection::transform_point(src, dst, c.x, c.y, src_is_geographic)
                .map(|(x, y)| Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(LineString::from(coords))
}

/// Pull the CRS identifier out of a legacy `crs` member, if one is present.
fn crs_from_foreign_members(
    members: Option<&serde_json::Map<String, JsonValue>>,
) -> Option<String> {
    members?
        .get("crs")?
        .get("properties")?
        .get("name")?
        .as_str()
        .map(str::to_string)
}

fn geometry_type_name(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}
