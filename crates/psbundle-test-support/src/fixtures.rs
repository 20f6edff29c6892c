//! Test fixtures and filesystem helpers.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Minimal executable header: `MZ` followed by two bytes.
pub const MZ_HEADER: [u8; 4] = [0x4D, 0x5A, 0x90, 0x00];

/// Standard base-64 of [`MZ_HEADER`].
pub const MZ_HEADER_BASE64: &str = "TVqQAA==";

/// Deterministic byte pattern of the requested length covering every byte value.
#[must_use]
pub fn sample_bytes(len: usize) -> Vec<u8> {
    (0..len)
        .map(|index| u8::try_from(index % 256).unwrap_or_default())
        .collect()
}

/// Fresh temporary directory with a recognisable prefix.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn temp_dir() -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix("psbundle-")
        .tempdir()
        .context("failed to create temporary directory")
}

/// Write `bytes` to `dir/name` and return the full path.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
