//! humboldt - a process-start registry of geospatial datasets
//!
//! Builds the dataset registry from a declaration table and reports what
//! loaded. The serving layer consumes the same build path as a library; this
//! binary exists so operators can verify a content root before deployment.

use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info};

use humboldt::registry::DatasetRegistry;
use humboldt::{declarations, logging, Config};

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            // Tracing may not be initialized yet if configuration failed
            eprintln!("humboldt: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> humboldt::Result<ExitCode> {
    let (config, args) = Config::load()?;

    logging::init_tracing(&config.log_level);
    info!("Starting humboldt v{}", env!("CARGO_PKG_VERSION"));

    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;
    let content_root = config.content_root()?;

    let table = match &config.data.declarations {
        Some(path) => {
            info!(path = %path.display(), "Loading declaration table");
            declarations::from_file(path)?
        }
        None => declarations::builtin(),
    };

    let start = Instant::now();
    let registry = DatasetRegistry::build(&table, content_root).map_err(|e| {
        logging::log_error(&e, "registry build");
        e
    })?;
    logging::log_operation_end("registry_build", start, registry.len() == table.len());

    let keys: Vec<&str> = registry.keys().collect();
    let shape_layer_count: usize = keys
        .iter()
        .filter_map(|k| registry.get(k))
        .map(|e| e.shape_layers.len())
        .sum();
    let feature_count: usize = keys
        .iter()
        .filter_map(|k| registry.get(k))
        .flat_map(|e| e.shape_layers.values())
        .map(|layer| layer.geometries.len())
        .sum();
    logging::log_registry_stats(
        table.len(),
        registry.len(),
        &keys,
        shape_layer_count,
        feature_count,
    );

    if let Some(key) = &args.dump {
        match registry.get(key) {
            Some(entry) => {
                println!("{}", entry.client_config);
            }
            None => {
                error!(dataset = %key, "Dataset is not in the registry");
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
