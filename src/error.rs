//! Error types for the humboldt registry.
//!
//! This module defines a single error enum covering every failure mode in the
//! dataset-loading pipeline, from file I/O up to declaration-table defects.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for humboldt operations.
#[derive(Error, Debug)]
pub enum HumboldtError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// GeoJSON parsing errors
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A boundary file contained a geometry other than Polygon/MultiPolygon.
    /// Fatal for that file's load.
    #[error("Unsupported geometry type {geometry:?} in {} (Polygons and MultiPolygons only)", .path.display())]
    GeometryType { path: PathBuf, geometry: String },

    /// A file referenced by a dataset declaration does not exist.
    /// Recovered by excluding the dataset from the registry.
    #[error("Missing file {} referenced by dataset '{dataset}'", .path.display())]
    MissingFile { dataset: String, path: PathBuf },

    /// A declaration names a source kind this build does not implement.
    /// Indicates a malformed declaration table; aborts registry construction.
    #[error("Unknown source kind: {kind:?}")]
    UnknownSourceKind { kind: String },

    /// Coordinate reference system / reprojection errors
    #[error("Projection error: {message}")]
    Projection { message: String },
}

/// Convenience type alias for Results with HumboldtError
pub type Result<T> = std::result::Result<T, HumboldtError>;
