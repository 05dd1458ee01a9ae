//! File system helpers with error context
//!
//! Thin wrappers over [`std::fs`] that attach the offending path to every
//! error, so failures deep in a staging tree still identify the file
//! involved.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Create a directory and all of its parents if they do not exist.
///
/// Safe to call on a directory that already exists.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

/// Copy a single file, creating the destination's parent directory first.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        ensure_dir(parent)?;
    }
    fs::copy(src, dst).with_context(|| {
        format!("Failed to copy file from {} to {}", src.display(), dst.display())
    })?;
    Ok(())
}

/// Read a file to a string with the path attached to any error.
pub fn read_text_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}
