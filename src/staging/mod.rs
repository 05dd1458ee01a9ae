//! Staging of self-contained package directories
//!
//! A [`StagingArea`] is the ephemeral tree handed to the external
//! compiler/validator for one primary source file: the primary copied in
//! as `package.wit` at the root, and a `deps/` subtree materialized by the
//! [`resolver`](crate::resolver) when the file declares dependencies.
//!
//! The area owns a [`TempDir`], so the whole tree is removed when the value
//! drops - on success after the tool invocation, and on every failure path
//! during resolution. A staging area is consumed by exactly one tool
//! invocation and never shared across files.

use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;
use tempfile::{Builder, TempDir};

use crate::reference::{self, PACKAGE_FILE_NAME};
use crate::resolver::{DEPS_DIR_NAME, DependencyResolver};
use crate::source::SourceFile;
use crate::utils::fs::{copy_file, ensure_dir, read_text_file};

/// Prefix used for staging directories under the system temp root.
const STAGING_PREFIX: &str = "witpkg-stage";

/// An exclusively-owned, ephemeral package directory.
///
/// Dropping the value removes the entire tree.
#[derive(Debug)]
pub struct StagingArea {
    temp: TempDir,
}

impl StagingArea {
    /// Root of the staged package tree (contains `package.wit`).
    #[must_use]
    pub fn path(&self) -> &Path {
        self.temp.path()
    }
}

/// Stage `source` into a fresh temporary directory under the system temp
/// root.
///
/// # Errors
///
/// Any resolution failure (most commonly
/// [`MissingDependency`](crate::core::WitpkgError::MissingDependency))
/// aborts the staging; the partially-built tree is removed before the
/// error is returned.
pub fn stage(source: &SourceFile, wit_root: &Path) -> Result<StagingArea> {
    let temp = Builder::new().prefix(STAGING_PREFIX).tempdir()?;
    populate(&temp, source, wit_root)?;
    Ok(StagingArea { temp })
}

/// Stage `source` into a fresh temporary directory created under `parent`.
///
/// Behaves exactly like [`stage`]; used where the caller needs to control
/// (and observe) where staging happens.
pub fn stage_in(source: &SourceFile, wit_root: &Path, parent: &Path) -> Result<StagingArea> {
    let temp = Builder::new().prefix(STAGING_PREFIX).tempdir_in(parent)?;
    populate(&temp, source, wit_root)?;
    Ok(StagingArea { temp })
}

fn populate(temp: &TempDir, source: &SourceFile, wit_root: &Path) -> Result<()> {
    let root = temp.path();
    copy_file(&source.path, &root.join(PACKAGE_FILE_NAME))?;

    let contents = read_text_file(&source.path)?;
    let dependencies = reference::extract_dependencies(&contents);
    if dependencies.is_empty() {
        tracing::debug!("{} declares no dependencies", source.reference);
        return Ok(());
    }

    let deps_dir = root.join(DEPS_DIR_NAME);
    ensure_dir(&deps_dir)?;

    let resolver = DependencyResolver::new(wit_root);
    let mut visited = HashSet::new();
    for dependency in &dependencies {
        resolver.resolve(&deps_dir, dependency, &mut visited)?;
    }

    tracing::debug!(
        "staged {} with {} direct dependencies at {}",
        source.reference,
        dependencies.len(),
        root.display()
    );
    Ok(())
}
