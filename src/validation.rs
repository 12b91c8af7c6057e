//! Dataset declaration validation.
//!
//! Checks that every file a declaration references exists under the content
//! root. Validation is not fail-fast: all missing files are collected so an
//! operator sees every problem with a dataset in one pass.

use std::path::Path;
use tracing::warn;

use crate::declarations::{DatasetDeclaration, SourceKind};
use crate::error::HumboldtError;

/// Return a [`HumboldtError::MissingFile`] for every referenced file that
/// does not exist.
///
/// Covers each shape layer's boundary file and, for custom-raster datasets,
/// the raster file itself. One warning is emitted per missing file, naming
/// the absolute path and the dataset key; an empty result means the dataset
/// is loadable as far as the filesystem is concerned.
pub fn missing_files(
    key: &str,
    decl: &DatasetDeclaration,
    content_root: &Path,
) -> Vec<HumboldtError> {
    let mut missing = Vec::new();

    if let Some(layers) = &decl.shape_layers {
        for layer in layers {
            let path = content_root.join(&layer.shapes_fn);
            if !path.exists() {
                let err = HumboldtError::MissingFile {
                    dataset: key.to_string(),
                    path,
                };
                warn!(
                    dataset = %key,
                    error = %err,
                    "Boundary file doesn't exist, this server will not be able to serve the dataset"
                );
                missing.push(err);
            }
        }
    }

    if decl.source_kind == SourceKind::CustomRaster {
        if let Some(data_fn) = &decl.data_fn {
            let path = content_root.join(data_fn);
            if !path.exists() {
                let err = HumboldtError::MissingFile {
                    dataset: key.to_string(),
                    path,
                };
                warn!(
                    dataset = %key,
                    error = %err,
                    "Raster file doesn't exist, this server will not be able to serve the dataset"
                );
                missing.push(err);
            }
        }
    }

    missing
}
