//! Push built package artifacts to an OCI registry.
//!
//! Credentials are required up front from the environment
//! (`WITPKG_REGISTRY_ACCOUNT` / `WITPKG_REGISTRY_TOKEN`); a run without
//! them fails immediately with no side effects, even under `--dry-run`.
//! Unless `--skip-package` is given, the package pipeline runs first so
//! the artifacts being pushed are fresh.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::config::{self, GlobalConfig, PipelineConfig, PublishConfig};
use crate::pipeline;
use crate::tools::registry::DEFAULT_REGISTRY;

/// Arguments for `witpkg publish`.
///
/// # Examples
///
/// ```bash
/// # Build and push everything
/// WITPKG_REGISTRY_ACCOUNT=me WITPKG_REGISTRY_TOKEN=... witpkg publish
///
/// # Push artifacts built earlier
/// witpkg publish --skip-package
///
/// # Show the pushes a run would perform
/// witpkg publish --dry-run --skip-package
/// ```
#[derive(Args)]
pub struct PublishCommand {
    /// Directory containing the WIT source files.
    #[arg(long, default_value = "wit")]
    wit_dir: PathBuf,

    /// Directory holding the built artifacts.
    #[arg(long, default_value = "target/wit")]
    out_dir: PathBuf,

    /// Registry host to push to (falls back to the global config file,
    /// then to ghcr.io).
    #[arg(long)]
    registry: Option<String>,

    /// Report every push without logging in or pushing.
    #[arg(long)]
    dry_run: bool,

    /// Reuse previously built artifacts instead of packaging first.
    #[arg(long)]
    skip_package: bool,
}

impl PublishCommand {
    /// Execute the publish pipeline.
    pub async fn execute(self) -> Result<()> {
        // Fail fast on missing credentials before anything else happens.
        let (account, token) = config::credentials_from_env()?;

        let global = GlobalConfig::load()?;
        let registry = self
            .registry
            .or(global.registry)
            .unwrap_or_else(|| DEFAULT_REGISTRY.to_string());

        let mut package_failed = false;
        if !self.skip_package {
            let package_config = PipelineConfig {
                wit_root: self.wit_dir.clone(),
                out_dir: self.out_dir.clone(),
                dry_run: self.dry_run,
            };
            let package_result = pipeline::run_package(&package_config).await?;
            package_failed = !package_result.is_success();
        }

        let publish_config = PublishConfig {
            wit_root: self.wit_dir,
            out_dir: self.out_dir,
            registry,
            account,
            token,
            dry_run: self.dry_run,
            skip_package: self.skip_package,
        };

        let result = pipeline::run_publish(&publish_config).await?;
        result.ensure_success("publish")?;

        if package_failed {
            anyhow::bail!("package step failed; artifacts above were not all built");
        }
        Ok(())
    }
}
