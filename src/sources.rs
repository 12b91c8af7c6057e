//! Raster-sourcing strategies.
//!
//! Each dataset gets one strategy object constructed at registry build time.
//! The strategy answers "describe the imagery covering this region of
//! interest" subject to the dataset's declared padding; it never fetches or
//! caches tiles itself. Dispatch on source kind happens exactly once, in
//! [`build_source`], never at call time.

use geo::{Coord, Point, Rect};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::declarations::{DatasetDeclaration, Padding, SourceKind};
use crate::error::{HumboldtError, Result};
use crate::shape_loader::LoadedShapeLayer;

/// Meters per degree of latitude, used to widen metric paddings on a
/// geographic region of interest.
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Where the imagery described by a [`CoveragePlan`] comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageryOrigin {
    /// A remote tile service, queried through its URL template
    TileService { url_template: String },
    /// The externally indexed nationwide raster catalog
    NationwideCatalog,
    /// A single local georeferenced raster
    RasterFile { path: PathBuf },
}

/// The shape an extraction region is clipped against.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskShape {
    /// Shape layer the mask came from
    pub layer: String,
    /// Index of the containing zone within that layer
    pub zone_index: usize,
}

/// Description of the raster imagery covering a region of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct CoveragePlan {
    /// Region of interest widened by the dataset's padding, in lon/lat
    pub extent: Rect<f64>,
    /// Imagery origin
    pub origin: ImageryOrigin,
    /// Mask to clip extraction against, when the source uses one
    pub mask: Option<MaskShape>,
}

/// Capability shared by all raster-sourcing strategies.
pub trait RasterSource: std::fmt::Debug + Send + Sync {
    /// The source kind this strategy implements.
    fn kind(&self) -> SourceKind;

    /// The declared extraction padding.
    fn padding(&self) -> Padding;

    /// Whether arbitrary-extent raster export is supported.
    fn supports_export(&self) -> bool {
        true
    }

    /// Describe the imagery covering `region` (lon/lat), padded per the
    /// declaration.
    fn resolve(&self, region: Rect<f64>) -> Result<CoveragePlan>;
}

/// Imagery looked up from a remote basemap tile service.
#[derive(Debug, Clone)]
pub struct BasemapSource {
    /// Tile URL template with `{z}/{x}/{y}` placeholders
    pub tile_url: String,
    padding: Padding,
}

impl RasterSource for BasemapSource {
    fn kind(&self) -> SourceKind {
        SourceKind::RemoteBasemap
    }

    fn padding(&self) -> Padding {
        self.padding
    }

    fn supports_export(&self) -> bool {
        false
    }

    fn resolve(&self, region: Rect<f64>) -> Result<CoveragePlan> {
        Ok(CoveragePlan {
            extent: padded_extent(region, self.padding),
            origin: ImageryOrigin::TileService {
                url_template: self.tile_url.clone(),
            },
            mask: None,
        })
    }
}

/// Imagery resolved from the nationwide pre-indexed raster catalog.
///
/// The catalog itself is owned by the extraction backend; this strategy only
/// carries the parameters that backend needs.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    /// Enriched shape layers of the owning dataset
    pub shape_layers: BTreeMap<String, LoadedShapeLayer>,
    padding: Padding,
}

impl RasterSource for CatalogSource {
    fn kind(&self) -> SourceKind {
        SourceKind::NationwideCatalog
    }

    fn padding(&self) -> Padding {
        self.padding
    }

    fn resolve(&self, region: Rect<f64>) -> Result<CoveragePlan> {
        Ok(CoveragePlan {
            extent: padded_extent(region, self.padding),
            origin: ImageryOrigin::NationwideCatalog,
            mask: None,
        })
    }
}

/// Imagery read from a single custom raster file, masked by the dataset's
/// shape layers.
#[derive(Debug, Clone)]
pub struct CustomRasterSource {
    /// Raster file path resolved against the content root
    pub raster_path: PathBuf,
    /// Enriched shape layers used to clip extraction results
    pub shape_layers: BTreeMap<String, LoadedShapeLayer>,
    padding: Padding,
}

impl RasterSource for CustomRasterSource {
    fn kind(&self) -> SourceKind {
        SourceKind::CustomRaster
    }

    fn padding(&self) -> Padding {
        self.padding
    }

    fn resolve(&self, region: Rect<f64>) -> Result<CoveragePlan> {
        // Extraction regions are clipped against the shape containing them.
        let center = Point::from(region.center());
        let mask = self.shape_layers.iter().find_map(|(name, layer)| {
            layer
                .geometries
                .iter()
                .position(|geom| geom.contains_point(center))
                .map(|zone_index| MaskShape {
                    layer: name.clone(),
                    zone_index,
                })
        });

        Ok(CoveragePlan {
            extent: padded_extent(region, self.padding),
            origin: ImageryOrigin::RasterFile {
                path: self.raster_path.clone(),
            },
            mask,
        })
    }
}

/// Construct the raster-sourcing strategy for a validated declaration.
///
/// This is the only place that switches on source kind. The enum is closed,
/// so a declaration that parsed cannot name an unimplemented kind; what can
/// still go wrong here is a kind/parameter mismatch in the table.
pub fn build_source(
    decl: &DatasetDeclaration,
    shape_layers: &BTreeMap<String, LoadedShapeLayer>,
    content_root: &Path,
) -> Result<Box<dyn RasterSource>> {
    match decl.source_kind {
        SourceKind::RemoteBasemap => {
            let tile_url = decl.data_url.clone().ok_or_else(|| HumboldtError::Config {
                message: "remote_basemap dataset declared without a data_url".to_string(),
            })?;
            Ok(Box::new(BasemapSource {
                tile_url,
                padding: decl.padding,
            }))
        }
        SourceKind::NationwideCatalog => Ok(Box::new(CatalogSource {
            shape_layers: shape_layers.clone(),
            padding: decl.padding,
        })),
        SourceKind::CustomRaster => {
            let data_fn = decl.data_fn.as_ref().ok_or_else(|| HumboldtError::Config {
                message: "custom_raster dataset declared without a data_fn".to_string(),
            })?;
            Ok(Box::new(CustomRasterSource {
                raster_path: content_root.join(data_fn),
                shape_layers: shape_layers.clone(),
                padding: decl.padding,
            }))
        }
    }
}

/// Widen a region of interest by the declared padding.
fn padded_extent(region: Rect<f64>, padding: Padding) -> Rect<f64> {
    let (dx, dy) = match padding {
        Padding::Degrees(d) => (d, d),
        Padding::Meters(m) => {
            // Metric padding on a geographic region scales with latitude
            let lat = region.center().y.to_radians();
            let dlat = m / METERS_PER_DEGREE;
            let dlon = m / (METERS_PER_DEGREE * lat.cos().abs().max(1e-6));
            (dlon, dlat)
        }
    };
    Rect::new(
        Coord {
            x: region.min().x - dx,
            y: region.min().y - dy,
        },
        Coord {
            x: region.max().x + dx,
            y: region.max().y + dy,
        },
    )
}
