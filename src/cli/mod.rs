//! Command-line interface for witpkg
//!
//! Each subcommand lives in its own module with its own argument struct
//! and execution logic:
//!
//! - `package` - stage every WIT source and build binary artifacts
//! - `validate` - stage every WIT source and run the binding/compile checks
//! - `publish` - push previously built artifacts to an OCI registry
//!
//! # Usage
//!
//! ```bash
//! # Build all packages into target/wit
//! witpkg package
//!
//! # Validate without producing artifacts
//! witpkg validate
//!
//! # Build and push (credentials from the environment)
//! WITPKG_REGISTRY_ACCOUNT=me WITPKG_REGISTRY_TOKEN=... witpkg publish
//!
//! # See what a publish would do, reusing existing artifacts
//! witpkg publish --dry-run --skip-package
//! ```
//!
//! All commands exit 0 on full success and 1 when any file failed or a
//! prerequisite was missing; an empty source directory is an
//! informational success.

mod package;
mod publish;
mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Main CLI structure for witpkg.
///
/// Global options apply to every subcommand; `--verbose` and `--quiet`
/// are mutually exclusive and control the tracing filter the binary
/// installs at startup.
#[derive(Parser)]
#[command(
    name = "witpkg",
    about = "Package, validate, and publish WIT interface packages",
    version
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable progress bars (also honored via WITPKG_NO_PROGRESS).
    #[arg(long, global = true)]
    no_progress: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Build every WIT source file into a binary package artifact.
    Package(package::PackageCommand),

    /// Check every WIT source file with the binding and compile validators.
    Validate(validate::ValidateCommand),

    /// Push built package artifacts to an OCI registry.
    Publish(publish::PublishCommand),
}

impl Cli {
    /// Tracing filter directive derived from the verbosity flags.
    ///
    /// The `WITPKG_LOG` environment variable, when set, overrides this in
    /// `main`.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }

    /// Execute the selected subcommand.
    pub async fn execute(self) -> Result<()> {
        if self.no_progress {
            // SAFETY: called once at startup, before any thread reads the
            // environment concurrently
            unsafe { std::env::set_var("WITPKG_NO_PROGRESS", "1") };
        }

        match self.command {
            Commands::Package(cmd) => cmd.execute().await,
            Commands::Validate(cmd) => cmd.execute().await,
            Commands::Publish(cmd) => cmd.execute().await,
        }
    }
}
