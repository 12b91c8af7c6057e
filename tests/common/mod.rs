//! Common test utilities for humboldt.
//!
//! This module provides shared fixture builders for testing the registry
//! build pipeline.

// Re-export all common test utilities
pub mod test_data;
