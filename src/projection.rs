//! Coordinate reference system helpers.
//!
//! UTM is near-equal-area only locally, so areas are measured in a projection
//! chosen per feature from its representative coordinate rather than one
//! global projection. The zone selection here is a pure function of the
//! coordinate, independent of any configuration. Transforms run through
//! proj4rs with proj strings resolved from the crs-definitions database.

use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use crate::error::{HumboldtError, Result};

/// Compute the UTM zone number for a latitude/longitude pair.
///
/// Standard 6-degree zones, with the conventional exceptions for southwest
/// Norway (zone 32V widened) and Svalbard. Callers must pass geographic
/// degrees within ±90 latitude and ±180 longitude; projected coordinates
/// would silently land in a meaningless zone.
pub fn utm_zone_number(lat: f64, lon: f64) -> u8 {
    debug_assert!(
        (-90.0..=90.0).contains(&lat),
        "latitude out of range: {lat}"
    );
    debug_assert!(
        (-180.0..=180.0).contains(&lon),
        "longitude out of range: {lon}"
    );
    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        return 32;
    }
    if (72.0..=84.0).contains(&lat) && lon >= 0.0 {
        if lon < 9.0 {
            return 31;
        } else if lon < 21.0 {
            return 33;
        } else if lon < 33.0 {
            return 35;
        } else if lon < 42.0 {
            return 37;
        }
    }
    (((lon + 180.0) / 6.0) as i32 % 60 + 1) as u8
}

/// Build the proj string for the local UTM projection of a feature whose
/// representative vertex sits at `lat`/`lon`.
pub fn utm_proj_string(lat: f64, lon: f64) -> String {
    let zone = utm_zone_number(lat, lon);
    let hemisphere = if lat > 0.0 { "+north" } else { "+south" };
    format!("+proj=utm +zone={zone} {hemisphere} +datum=WGS84 +units=m +no_defs")
}

/// Resolve a source CRS identifier to its proj string.
///
/// Accepts `EPSG:nnnn`, the URN forms `urn:ogc:def:crs:EPSG::nnnn` and
/// `urn:ogc:def:crs:OGC:1.3:CRS84`, and bare `CRS84`/`OGC:CRS84` (all
/// equivalent to EPSG:4326 for our lon/lat coordinate order).
pub fn resolve_crs(ident: &str) -> Result<&'static str> {
    let code = parse_epsg(ident)?;
    crs_definitions::from_code(code)
        .map(|def| def.proj4)
        .ok_or_else(|| HumboldtError::Projection {
            message: format!("EPSG:{code} is not in the crs-definitions database"),
        })
}

/// Extract the EPSG code from a CRS identifier string.
fn parse_epsg(ident: &str) -> Result<u16> {
    let upper = ident.trim().to_ascii_uppercase();

    if upper == "CRS84" || upper == "OGC:CRS84" || upper == "URN:OGC:DEF:CRS:OGC:1.3:CRS84" {
        return Ok(4326);
    }

    let code_part = if let Some(rest) = upper.strip_prefix("URN:OGC:DEF:CRS:EPSG:") {
        // urn:ogc:def:crs:EPSG::4326 (version slot may be empty)
        rest.rsplit(':').next().unwrap_or(rest)
    } else if let Some(rest) = upper.strip_prefix("EPSG:") {
        rest
    } else {
        return Err(HumboldtError::Projection {
            message: format!("Unrecognized CRS identifier: {ident:?}"),
        });
    };

    code_part
        .parse::<u16>()
        .map_err(|_| HumboldtError::Projection {
            message: format!("Unrecognized CRS identifier: {ident:?}"),
        })
}

/// Whether a proj string describes a geographic (lon/lat) CRS.
pub fn is_geographic(proj_string: &str) -> bool {
    proj_string.contains("+proj=longlat")
}

/// Parse a proj string into a proj4rs projection.
pub fn make_proj(proj_string: &str) -> Result<Proj> {
    Proj::from_proj_string(proj_string).map_err(|e| HumboldtError::Projection {
        message: format!("Invalid projection {proj_string:?}: {e:?}"),
    })
}

/// Transform a single coordinate between two projections.
///
/// proj4rs expects radians for geographic input, so `src_is_geographic`
/// must reflect the source proj string.
pub fn transform_point(
    src: &Proj,
    dst: &Proj,
    x: f64,
    y: f64,
    src_is_geographic: bool,
) -> Result<(f64, f64)> {
    let (x_in, y_in) = if src_is_geographic {
        (x.to_radians(), y.to_radians())
    } else {
        (x, y)
    };

    let mut point = (x_in, y_in, 0.0);
    transform(src, dst, &mut point).map_err(|e| HumboldtError::Projection {
        message: format!("Transform failed: {e:?}"),
    })?;

    Ok((point.0, point.1))
}
