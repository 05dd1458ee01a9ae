//! Build every WIT source file into a binary package artifact.
//!
//! Discovers sources under the WIT root, stages each with its transitive
//! dependency tree, and hands the staged directory to the component
//! builder. World directories are built as-is; the vendored upstream
//! package is skipped with a note.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::config::{DRY_RUN_ENV_VAR, PipelineConfig};
use crate::pipeline;

/// Arguments for `witpkg package`.
///
/// # Examples
///
/// ```bash
/// # Build everything under ./wit into ./target/wit
/// witpkg package
///
/// # Alternate locations
/// witpkg package --wit-dir interfaces --out-dir dist
///
/// # Report what would be built without invoking the toolchain
/// witpkg package --dry-run
/// DRY_RUN=1 witpkg package
/// ```
#[derive(Args)]
pub struct PackageCommand {
    /// Directory containing the WIT source files.
    #[arg(long, default_value = "wit")]
    wit_dir: PathBuf,

    /// Directory receiving the built artifacts.
    #[arg(long, default_value = "target/wit")]
    out_dir: PathBuf,

    /// Report every build without invoking the component builder.
    #[arg(long)]
    dry_run: bool,
}

impl PackageCommand {
    /// Execute the package pipeline.
    ///
    /// Exits non-zero when any file fails; a source directory without WIT
    /// files is an informational success.
    pub async fn execute(self) -> Result<()> {
        let config = PipelineConfig {
            wit_root: self.wit_dir,
            out_dir: self.out_dir,
            dry_run: self.dry_run || dry_run_from_env(),
        };

        let result = pipeline::run_package(&config).await?;
        result.ensure_success("package")
    }
}

/// The `DRY_RUN` environment variable enables dry-run mode when set to `1`.
fn dry_run_from_env() -> bool {
    std::env::var(DRY_RUN_ENV_VAR).is_ok_and(|value| value == "1")
}
