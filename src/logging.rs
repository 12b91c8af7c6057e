//! Logging utilities for the humboldt registry build.
//!
//! This module provides structured logging so the diagnostics stream (the
//! only signal that a declared dataset failed to load) is searchable and
//! useful in production deployments.

use std::time::Instant;
use tracing::{error, info, warn};

/// Initialize the tracing subscriber with the given log level
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Log the completion of a significant operation
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration = start_time.elapsed();
    let duration_ms = duration.as_secs_f64() * 1000.0;

    if success {
        info!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed successfully"
        );
    } else {
        warn!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed with warnings"
        );
    }
}

/// Log detailed information about a built registry
pub fn log_registry_stats(
    declared: usize,
    loaded: usize,
    dataset_keys: &[&str],
    shape_layer_count: usize,
    feature_count: usize,
) {
    info!(
        operation = "registry_build",
        declared = declared,
        loaded = loaded,
        datasets = %dataset_keys.join(", "),
        shape_layers = shape_layer_count,
        features = feature_count,
        "Registry loaded"
    );
}

/// Log an error with context
pub fn log_error(error: &crate::error::HumboldtError, context: &str) {
    error!(
        error = %error,
        context = context,
        error_type = std::any::type_name_of_val(error),
        "Error occurred"
    );
}
