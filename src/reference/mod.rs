//! Package references and WIT declaration parsing
//!
//! A [`PackageReference`] identifies a WIT package by `namespace:name` with
//! an optional `@version`. Equality is exact string identity: no semantic
//! version comparison happens anywhere in witpkg.
//!
//! The module also contains the two read-only parsers the pipeline is built
//! on:
//! - [`package_declaration`] - the `package ns:name@version;` line that names
//!   a source file's own package
//! - [`extract_dependencies`] - the `use`/`import` lines that reference other
//!   packages
//!
//! Both scan line by line and never touch the file system.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::core::WitpkgError;

/// File name a package's primary source takes inside a staged directory.
pub const PACKAGE_FILE_NAME: &str = "package.wit";

/// Reserved file name marking a directory as a self-contained package root.
pub const WORLD_FILE_NAME: &str = "world.wit";

/// Matches a dependency declaration: a leading `use` or `import` keyword, a
/// `namespace:name` token, an optional `/`-separated interface path (ignored),
/// and a mandatory `@version` suffix. The version capture stops at the first
/// character outside `[A-Za-z0-9._-]`.
static DEPENDENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:use|import)\s+([A-Za-z][A-Za-z0-9_-]*):([A-Za-z][A-Za-z0-9_-]*)(?:/[A-Za-z0-9_./-]*)?@([A-Za-z0-9._-]+)")
        .expect("dependency pattern is valid")
});

/// Matches a dependency declaration that names a package but carries no
/// version. Used only to log the drop distinctly from "no dependencies".
static UNVERSIONED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:use|import)\s+[A-Za-z][A-Za-z0-9_-]*:[A-Za-z0-9_/.-]+")
        .expect("unversioned pattern is valid")
});

/// Identifies a WIT package: `namespace:name@version`.
///
/// The version segment is optional and means "unversioned/latest" when
/// absent. The canonical textual form is produced by the [`fmt::Display`]
/// implementation and parsed back by [`FromStr`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageReference {
    /// Package namespace (never contains `:`)
    pub namespace: String,
    /// Package name
    pub name: String,
    /// Exact version string, or `None` for "unversioned/latest"
    pub version: Option<String>,
}

impl PackageReference {
    /// Create a versioned reference.
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            version: Some(version.into()),
        }
    }

    /// Token safe for use as a file system path component and registry tag:
    /// every `:` and `@` is replaced with `-`.
    ///
    /// The mapping is injective for the reference space actually in use
    /// (namespaces, names, and versions do not themselves contain `:` or
    /// `@`). Distinct references that sanitize identically are an accepted,
    /// documented risk and are not detected.
    #[must_use]
    pub fn sanitized(&self) -> String {
        self.to_string().replace([':', '@'], "-")
    }

    /// Deterministic file name a dependency's source is expected under in
    /// the WIT root: the `namespace:name` with `:` replaced by `-`, the
    /// literal `@version` kept, and a `.wit` extension.
    #[must_use]
    pub fn source_file_name(&self) -> String {
        match &self.version {
            Some(version) => format!("{}-{}@{version}.wit", self.namespace, self.name),
            None => format!("{}-{}.wit", self.namespace, self.name),
        }
    }

    /// Registry tag: the literal version, or `latest` when unversioned.
    #[must_use]
    pub fn version_or_latest(&self) -> &str {
        self.version.as_deref().unwrap_or("latest")
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)?;
        if let Some(version) = &self.version {
            write!(f, "@{version}")?;
        }
        Ok(())
    }
}

impl FromStr for PackageReference {
    type Err = WitpkgError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || WitpkgError::InvalidPackageReference {
            input: input.to_string(),
        };

        let (qualified, version) = match input.split_once('@') {
            Some((qualified, version)) => {
                if version.is_empty() || version.contains('@') {
                    return Err(invalid());
                }
                (qualified, Some(version.to_string()))
            }
            None => (input, None),
        };

        let (namespace, name) = qualified.split_once(':').ok_or_else(invalid)?;
        if namespace.is_empty() || name.is_empty() || name.contains(':') {
            return Err(invalid());
        }

        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            version,
        })
    }
}

/// Read the package declaration from WIT file contents.
///
/// Scans for the first line of the form `package namespace:name@version;`
/// and parses the reference. Returns `None` when no declaration is present
/// or the reference does not parse; callers decide whether that is a
/// per-file error.
#[must_use]
pub fn package_declaration(contents: &str) -> Option<PackageReference> {
    for line in contents.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("package ") {
            return rest.trim_end_matches(';').trim().parse().ok();
        }
    }
    None
}

/// Extract the cross-package dependencies declared in WIT file contents.
///
/// Every line matching a `use`/`import` declaration with an explicit
/// `@version` contributes one reference; the interface path segment between
/// the package name and the version is ignored. The result is deduplicated
/// and sorted, so the order of appearance in the file never affects it.
///
/// A declaration without a version cannot be resolved and contributes
/// nothing; the drop is logged at debug level, distinctly from the
/// no-dependencies case.
#[must_use]
pub fn extract_dependencies(contents: &str) -> Vec<PackageReference> {
    let mut dependencies = Vec::new();

    for line in contents.lines() {
        let trimmed = line.trim_start();
        if let Some(captures) = DEPENDENCY_RE.captures(trimmed) {
            let mut version = captures[3].to_string();
            while version.ends_with('.') {
                version.pop();
            }
            if version.is_empty() {
                tracing::debug!("ignoring dependency declaration without a version: {trimmed}");
                continue;
            }
            dependencies.push(PackageReference::new(&captures[1], &captures[2], version));
        } else if UNVERSIONED_RE.is_match(trimmed) {
            tracing::debug!("ignoring unversioned dependency declaration: {trimmed}");
        }
    }

    dependencies.sort();
    dependencies.dedup();
    dependencies
}
