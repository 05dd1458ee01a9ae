//! Configuration for pipeline runs
//!
//! All state a driver needs arrives in an explicit configuration struct -
//! there is no global mutable state beyond the process environment the
//! structs are assembled from. [`PipelineConfig`] covers the package and
//! validate pipelines; [`PublishConfig`] adds registry coordinates and
//! credentials.
//!
//! An optional global configuration file (`~/.witpkg/config.toml`) can
//! provide a default for the registry host:
//!
//! ```toml
//! registry = "ghcr.io"
//! ```
//!
//! Command-line flags always override it. Credentials are never read from
//! the file; they come exclusively from the environment.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::core::WitpkgError;

/// Environment variable holding the registry account for publishing.
pub const ACCOUNT_ENV_VAR: &str = "WITPKG_REGISTRY_ACCOUNT";

/// Environment variable holding the registry token for publishing.
pub const TOKEN_ENV_VAR: &str = "WITPKG_REGISTRY_TOKEN";

/// Environment variable enabling dry-run mode for the package pipeline
/// (`1` enables, anything else leaves it off).
pub const DRY_RUN_ENV_VAR: &str = "DRY_RUN";

/// Optional defaults read from `~/.witpkg/config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalConfig {
    /// Default registry host for publishing
    pub registry: Option<String>,
}

impl GlobalConfig {
    /// Location of the global configuration file, when a home directory
    /// can be determined.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".witpkg").join("config.toml"))
    }

    /// Load the global configuration, returning defaults when the file
    /// does not exist.
    pub fn load() -> Result<Self> {
        let Some(path) = Self::default_path() else {
            return Ok(Self::default());
        };
        if !path.is_file() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Configuration for the package and validate pipelines.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory scanned for WIT source files
    pub wit_root: PathBuf,
    /// Directory receiving built artifacts
    pub out_dir: PathBuf,
    /// When set, report every step without invoking external tools or
    /// writing outside pre-existing output directories
    pub dry_run: bool,
}

/// Configuration for the publish pipeline.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Directory scanned for WIT source files
    pub wit_root: PathBuf,
    /// Directory holding previously built artifacts
    pub out_dir: PathBuf,
    /// Registry host to push to
    pub registry: String,
    /// Registry account (from [`ACCOUNT_ENV_VAR`])
    pub account: String,
    /// Registry token (from [`TOKEN_ENV_VAR`])
    pub token: String,
    /// Report every step without logging in or pushing
    pub dry_run: bool,
    /// Reuse previously built artifacts instead of running the package
    /// pipeline first
    pub skip_package: bool,
}

/// Read publish credentials from the environment.
///
/// Checked before any other publish work so a misconfigured run fails
/// fast with no side effects - including under `--dry-run`.
///
/// # Errors
///
/// [`WitpkgError::MissingCredentials`] naming both required variables
/// when either is absent or empty.
pub fn credentials_from_env() -> Result<(String, String)> {
    let account = std::env::var(ACCOUNT_ENV_VAR).ok().filter(|value| !value.is_empty());
    let token = std::env::var(TOKEN_ENV_VAR).ok().filter(|value| !value.is_empty());
    match (account, token) {
        (Some(account), Some(token)) => Ok((account, token)),
        _ => Err(WitpkgError::MissingCredentials {
            account_var: ACCOUNT_ENV_VAR.to_string(),
            token_var: TOKEN_ENV_VAR.to_string(),
        }
        .into()),
    }
}
