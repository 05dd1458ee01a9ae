//! Check every WIT source file with the binding and compile validators.
//!
//! Runs the same discovery/exclusion/staging flow as `package`, but
//! instead of producing artifacts it runs two independent checks per
//! file: binding documentation generation and a component-compile check.
//! Either failing marks the file failed.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::pipeline;

/// Arguments for `witpkg validate`.
///
/// The exit code reflects the aggregate pass/fail of the batch.
#[derive(Args)]
pub struct ValidateCommand {
    /// Directory containing the WIT source files.
    #[arg(long, default_value = "wit")]
    wit_dir: PathBuf,
}

impl ValidateCommand {
    /// Execute the validate pipeline.
    pub async fn execute(self) -> Result<()> {
        let result = pipeline::run_validate(&self.wit_dir).await?;
        result.ensure_success("validate")
    }
}
