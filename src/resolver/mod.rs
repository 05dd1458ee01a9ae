//! Recursive dependency resolution and materialization
//!
//! Given a package reference, the resolver locates the dependency's source
//! file in the WIT root, copies it into a `deps/` tree as `package.wit`,
//! and recurses into that file's own dependencies.
//!
//! # Termination
//!
//! Cycles and diamonds are handled by an explicit visited set keyed by
//! [`PackageReference`], threaded through the whole recursion of one
//! staging operation. A reference that has already been materialized
//! anywhere in the tree is skipped, so a genuine cycle terminates and a
//! diamond materializes its shared dependency exactly once - under
//! whichever ancestor reached it first. Content is identical regardless of
//! the depth the copy lands at, so reuse of the first copy is correct.
//!
//! # Lookup
//!
//! A dependency's source is expected at the deterministic location
//! `<wit-root>/<namespace>-<name>@<version>.wit`. When that file is absent
//! the root's remaining top-level WIT files are scanned for one whose own
//! package declaration matches the reference. If neither locates a source,
//! resolution of the current top-level file fails with
//! [`WitpkgError::MissingDependency`]; the rest of the batch proceeds.

use anyhow::Result;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::WitpkgError;
use crate::reference::{self, PACKAGE_FILE_NAME, PackageReference};
use crate::utils::fs::{copy_file, ensure_dir, read_text_file};

/// Name of the nested dependency directory at every level of a staged tree.
pub const DEPS_DIR_NAME: &str = "deps";

/// Materializes transitive dependency trees from a flat WIT source root.
pub struct DependencyResolver<'a> {
    wit_root: &'a Path,
}

impl<'a> DependencyResolver<'a> {
    /// Create a resolver reading sources from `wit_root`.
    #[must_use]
    pub const fn new(wit_root: &'a Path) -> Self {
        Self { wit_root }
    }

    /// Locate the source file for a dependency reference.
    ///
    /// Checks the deterministic file name first, then falls back to
    /// scanning the root's top-level WIT files for a matching package
    /// declaration.
    ///
    /// # Errors
    ///
    /// [`WitpkgError::MissingDependency`] when no source can be located.
    pub fn source_path(&self, reference: &PackageReference) -> Result<PathBuf> {
        let deterministic = self.wit_root.join(reference.source_file_name());
        if deterministic.is_file() {
            return Ok(deterministic);
        }

        // The file may carry a name that does not follow the convention;
        // trust package declarations over file names before giving up.
        for entry in fs::read_dir(self.wit_root)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("wit") {
                continue;
            }
            let Ok(contents) = fs::read_to_string(&path) else {
                continue;
            };
            if reference::package_declaration(&contents).as_ref() == Some(reference) {
                tracing::debug!(
                    "resolved {reference} to {} by package declaration",
                    path.display()
                );
                return Ok(path);
            }
        }

        Err(WitpkgError::MissingDependency {
            reference: reference.to_string(),
            searched: deterministic,
        }
        .into())
    }

    /// Materialize `reference` (and, recursively, its transitive
    /// dependencies) under `deps_dir`.
    ///
    /// `visited` is shared across the entire staging operation; an
    /// already-visited reference is skipped without touching the tree.
    pub fn resolve(
        &self,
        deps_dir: &Path,
        reference: &PackageReference,
        visited: &mut HashSet<PackageReference>,
    ) -> Result<()> {
        if !visited.insert(reference.clone()) {
            tracing::trace!("{reference} already materialized, skipping");
            return Ok(());
        }

        let source = self.source_path(reference)?;
        let dest_dir = deps_dir.join(reference.sanitized());
        ensure_dir(&dest_dir)?;
        copy_file(&source, &dest_dir.join(PACKAGE_FILE_NAME))?;

        let contents = read_text_file(&source)?;
        let dependencies = reference::extract_dependencies(&contents);
        if dependencies.is_empty() {
            return Ok(());
        }

        let nested = dest_dir.join(DEPS_DIR_NAME);
        ensure_dir(&nested)?;
        for dependency in &dependencies {
            self.resolve(&nested, dependency, visited)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_wit(root: &Path, file: &str, contents: &str) {
        fs::write(root.join(file), contents).unwrap();
    }

    #[test]
    fn resolves_deterministic_location_first() -> Result<()> {
        let temp = tempdir()?;
        let root = temp.path();
        write_wit(root, "b-pkg@2.0.wit", "package b:pkg@2.0;\n");

        let resolver = DependencyResolver::new(root);
        let reference = PackageReference::new("b", "pkg", "2.0");
        assert_eq!(resolver.source_path(&reference)?, root.join("b-pkg@2.0.wit"));
        Ok(())
    }

    #[test]
    fn falls_back_to_declaration_scan() -> Result<()> {
        let temp = tempdir()?;
        let root = temp.path();
        write_wit(root, "misnamed.wit", "package b:pkg@2.0;\n");

        let resolver = DependencyResolver::new(root);
        let reference = PackageReference::new("b", "pkg", "2.0");
        assert_eq!(resolver.source_path(&reference)?, root.join("misnamed.wit"));
        Ok(())
    }

    #[test]
    fn missing_source_is_missing_dependency() {
        let temp = tempdir().unwrap();
        let resolver = DependencyResolver::new(temp.path());
        let reference = PackageReference::new("ghost", "pkg", "1.0");

        let error = resolver.source_path(&reference).unwrap_err();
        let witpkg_error = error.downcast_ref::<WitpkgError>().unwrap();
        assert!(matches!(witpkg_error, WitpkgError::MissingDependency { .. }));
    }

    #[test]
    fn materializes_nested_tree() -> Result<()> {
        let temp = tempdir()?;
        let root = temp.path();
        write_wit(root, "a-pkg@1.0.wit", "package a:pkg@1.0;\nuse b:pkg/iface@2.0;\n");
        write_wit(root, "b-pkg@2.0.wit", "package b:pkg@2.0;\nuse c:pkg/iface@3.0;\n");
        write_wit(root, "c-pkg@3.0.wit", "package c:pkg@3.0;\n");

        let staged = tempdir()?;
        let deps_dir = staged.path().join(DEPS_DIR_NAME);
        ensure_dir(&deps_dir)?;

        let resolver = DependencyResolver::new(root);
        let mut visited = HashSet::new();
        resolver.resolve(&deps_dir, &PackageReference::new("b", "pkg", "2.0"), &mut visited)?;

        let b_dir = deps_dir.join("b-pkg-2.0");
        assert!(b_dir.join(PACKAGE_FILE_NAME).is_file());
        assert!(b_dir.join(DEPS_DIR_NAME).join("c-pkg-3.0").join(PACKAGE_FILE_NAME).is_file());
        Ok(())
    }

    #[test]
    fn cycle_terminates_with_one_directory_per_reference() -> Result<()> {
        let temp = tempdir()?;
        let root = temp.path();
        write_wit(root, "a-pkg@1.0.wit", "package a:pkg@1.0;\nuse b:pkg/iface@1.0;\n");
        write_wit(root, "b-pkg@1.0.wit", "package b:pkg@1.0;\nuse a:pkg/iface@1.0;\n");

        let staged = tempdir()?;
        let deps_dir = staged.path().join(DEPS_DIR_NAME);
        ensure_dir(&deps_dir)?;

        let resolver = DependencyResolver::new(root);
        let mut visited = HashSet::new();
        resolver.resolve(&deps_dir, &PackageReference::new("b", "pkg", "1.0"), &mut visited)?;

        // b at the top, a nested beneath it, and no further recursion.
        let b_dir = deps_dir.join("b-pkg-1.0");
        let a_dir = b_dir.join(DEPS_DIR_NAME).join("a-pkg-1.0");
        assert!(b_dir.join(PACKAGE_FILE_NAME).is_file());
        assert!(a_dir.join(PACKAGE_FILE_NAME).is_file());
        assert!(!a_dir.join(DEPS_DIR_NAME).join("b-pkg-1.0").exists());
        Ok(())
    }
}
