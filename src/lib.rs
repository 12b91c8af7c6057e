//! # humboldt
//!
//! A process-start registry of geospatial datasets for map-serving backends.
//!
//! This library validates dataset declarations, loads GeoJSON boundary files,
//! reprojects each feature into its own UTM zone to compute faithful areas,
//! and associates every dataset with the strategy used to source its raster
//! imagery (remote basemap tiles, a nationwide pre-indexed raster catalog, or
//! a single custom raster file).
//!
//! ## Key Properties
//!
//! - **Build once, read forever**: the registry is assembled at process start
//!   and never mutated afterwards
//! - **Per-feature projections**: each boundary feature is measured in its
//!   own best-fit UTM zone, so areas stay accurate anywhere on Earth
//! - **Degrade, don't abort**: a dataset with missing files or bad geometry
//!   is excluded with a diagnostic while the rest of the registry loads
//!
//! ## Architecture
//!
//! - **Declarations**: the static table describing each dataset
//! - **Loading**: boundary-file parsing, validation and area measurement
//! - **Registry**: the immutable, queryable result consumed by the serving
//!   layer

pub mod client_config;
pub mod config;
pub mod declarations;
pub mod error;
pub mod logging;
pub mod projection;
pub mod registry;
pub mod shape_loader;
pub mod sources;
pub mod validation;

pub use config::Config;
pub use declarations::{
    DatasetDeclaration, DeclarationTable, Padding, ShapeLayerDeclaration, SourceKind,
    TileLayerOptions, Viewport,
};
pub use error::{HumboldtError, Result};
pub use logging::init_tracing;
pub use registry::{DatasetEntry, DatasetRegistry};
pub use shape_loader::{LoadedShapeLayer, LoadedShapes, ZoneGeometry};
pub use sources::{CoveragePlan, ImageryOrigin, RasterSource};
