//! Source file discovery and classification
//!
//! A batch run starts by enumerating every WIT file directly under the
//! source root or one directory level below it. Each discovered path is
//! classified as either an ordinary source file or a *world file* - a file
//! with the reserved name `world.wit` inside a directory named after a
//! sanitized package reference. World directories are self-contained
//! package roots: they are handed to the component builder as-is and never
//! go through dependency staging.
//!
//! Discovery is re-run from scratch on every invocation; nothing about a
//! previous run is cached.

use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::WitpkgError;
use crate::reference::{self, PackageReference, WORLD_FILE_NAME};
use crate::utils::fs::read_text_file;

/// How a discovered file participates in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Ordinary interface file; staged with its dependency tree before any
    /// tool invocation.
    Plain,
    /// Reserved-name file whose containing directory is a complete package
    /// root; bypasses staging.
    World,
}

/// One discovered interface-definition file and its declared package.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path to the file on disk
    pub path: PathBuf,
    /// The package the file declares
    pub reference: PackageReference,
    /// Plain source or world file
    pub kind: SourceKind,
}

impl SourceFile {
    /// Load a discovered path: read it, require a package declaration, and
    /// classify it.
    ///
    /// # Errors
    ///
    /// Returns [`WitpkgError::MissingPackageDeclaration`] when the file has
    /// no parseable `package` line, or [`WitpkgError::FileSystemError`]
    /// when it cannot be read. Both are per-file errors; the caller
    /// records them and moves on.
    pub fn load(path: &Path, wit_root: &Path) -> Result<Self, WitpkgError> {
        let contents = read_text_file(path).map_err(|_| WitpkgError::FileSystemError {
            operation: "read".to_string(),
            path: path.display().to_string(),
        })?;
        let reference = reference::package_declaration(&contents).ok_or_else(|| {
            WitpkgError::MissingPackageDeclaration {
                path: path.to_path_buf(),
            }
        })?;

        let kind = if is_world_file(path, wit_root) {
            SourceKind::World
        } else {
            SourceKind::Plain
        };

        Ok(Self {
            path: path.to_path_buf(),
            reference,
            kind,
        })
    }

    /// Whether this is a world file (see [`SourceKind::World`]).
    #[must_use]
    pub fn is_world(&self) -> bool {
        self.kind == SourceKind::World
    }

    /// The directory handed to the component builder for a world file.
    #[must_use]
    pub fn package_dir(&self) -> Option<&Path> {
        match self.kind {
            SourceKind::World => self.path.parent(),
            SourceKind::Plain => None,
        }
    }
}

/// A file is a world file when it carries the reserved name and sits one
/// level below the WIT root, inside its package directory.
fn is_world_file(path: &Path, wit_root: &Path) -> bool {
    if path.file_name().and_then(|name| name.to_str()) != Some(WORLD_FILE_NAME) {
        return false;
    }
    path.parent().is_some_and(|parent| parent != wit_root)
}

/// Enumerate every `.wit` file directly under `wit_root` or one directory
/// level below it, in sorted order for deterministic batches.
///
/// Returns an empty list (not an error) when the root contains no WIT
/// files; drivers treat that as an informational no-op.
pub fn discover(wit_root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(wit_root).min_depth(1).max_depth(2).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("wit") {
            files.push(path.to_path_buf());
        }
    }

    tracing::debug!("discovered {} WIT source file(s) under {}", files.len(), wit_root.display());
    Ok(files)
}
