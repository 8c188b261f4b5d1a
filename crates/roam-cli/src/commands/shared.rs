//! Shared command utilities

use std::path::Path;

use anyhow::{Context, Result};
use roam_core::ReferenceData;

/// Load reference data, honoring overrides in `data_dir`
pub fn load_reference(data_dir: Option<&Path>) -> Result<ReferenceData> {
    ReferenceData::load(data_dir).context("Failed to load reference data")
}
