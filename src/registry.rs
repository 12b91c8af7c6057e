//! The dataset registry.
//!
//! Built once at process start from a declaration table, then treated as
//! read-only for the life of the process. A dataset that fails validation or
//! loading produces no entry; the only signal is the diagnostics emitted
//! during the build. Structural defects in the table itself abort the build.

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

use crate::client_config;
use crate::declarations::{DatasetDeclaration, DeclarationTable};
use crate::error::Result;
use crate::shape_loader::{self, LoadedShapeLayer};
use crate::sources::{self, RasterSource};
use crate::validation;

/// One successfully loaded dataset.
///
/// Created during the registry build and never mutated afterwards.
#[derive(Debug)]
pub struct DatasetEntry {
    /// Strategy for sourcing raster imagery
    pub source: Box<dyn RasterSource>,
    /// Enriched shape layers, keyed by layer name
    pub shape_layers: BTreeMap<String, LoadedShapeLayer>,
    /// Client-consumable configuration snippet
    pub client_config: String,
}

/// The immutable registry of loaded datasets.
#[derive(Debug, Default)]
pub struct DatasetRegistry {
    entries: BTreeMap<String, DatasetEntry>,
}

impl DatasetRegistry {
    /// Build the registry from a declaration table.
    ///
    /// Per-dataset failures (missing files, bad geometry) exclude that
    /// dataset and continue; table-level defects abort with an error. Each
    /// dataset's load is independent of every other's.
    pub fn build(table: &DeclarationTable, content_root: &Path) -> Result<Self> {
        let mut entries = BTreeMap::new();
        let mut skipped = 0usize;

        for (key, decl) in table {
            match build_entry(key, decl, content_root)? {
                Some(entry) => {
                    entries.insert(key.clone(), entry);
                }
                None => skipped += 1,
            }
        }

        info!(
            loaded = entries.len(),
            skipped,
            content_root = %content_root.display(),
            "Dataset registry built"
        );

        Ok(Self { entries })
    }

    /// Look up a dataset by key.
    pub fn get(&self, key: &str) -> Option<&DatasetEntry> {
        self.entries.get(key)
    }

    /// Whether a dataset with this key was loaded.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Enumerate all loaded dataset keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of loaded datasets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load one dataset. `Ok(None)` means the dataset is unloadable and has been
/// diagnosed; `Err` means the declaration table itself is defective.
fn build_entry(
    key: &str,
    decl: &DatasetDeclaration,
    content_root: &Path,
) -> Result<Option<DatasetEntry>> {
    let missing = validation::missing_files(key, decl, content_root);
    let mut loadable = missing.is_empty();

    // Layers whose files exist still load, so one absent file costs the
    // dataset but not the diagnostics for the rest of its layers.
    let mut shape_layers = BTreeMap::new();
    if let Some(layers) = &decl.shape_layers {
        for layer_decl in layers {
            let path = content_root.join(&layer_decl.shapes_fn);
            if !path.exists() {
                // Already diagnosed by the validator
                continue;
            }
            match shape_loader::load_shape_file(&path) {
                Ok(shapes) => {
                    shape_layers.insert(
                        layer_decl.name.clone(),
                        LoadedShapeLayer::new(layer_decl, shapes),
                    );
                }
                Err(e) => {
                    warn!(
                        dataset = %key,
                        path = %path.display(),
                        error = %e,
                        "Failed to load boundary file, this server will not be able to serve the dataset"
                    );
                    loadable = false;
                }
            }
        }
    }

    if !loadable {
        return Ok(None);
    }

    let source = sources::build_source(decl, &shape_layers, content_root)?;
    let client_config = client_config::render(decl)?;

    Ok(Some(DatasetEntry {
        source,
        shape_layers,
        client_config,
    }))
}
