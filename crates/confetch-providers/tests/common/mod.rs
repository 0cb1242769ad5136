//! Common test helpers for confetch-providers integration tests

use anyhow::Result;
use confetch_core::ProviderParams;
use std::path::{Path, PathBuf};

/// Build provider parameters from string pairs.
pub fn params(pairs: &[(&str, &str)]) -> ProviderParams {
    pairs.iter().copied().collect()
}

/// Seed a file under `dir` so a provider finds it already materialized.
#[allow(dead_code)]
pub fn seed_file(dir: &Path, name: &str, contents: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, contents)?;
    Ok(path)
}
