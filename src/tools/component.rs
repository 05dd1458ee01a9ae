//! Adapters for the WIT component toolchain
//!
//! Thin, named operations over [`ToolCommand`] for the three external
//! collaborators the package and validate pipelines delegate to:
//!
//! - `wkg wit build` - compiles a staged package directory (or a world
//!   directory) into a single binary artifact
//! - `wit-bindgen markdown` - emits binding documentation, used as a
//!   semantic check of the staged package
//! - `wasm-tools component wit --wasm` - compiles the staged package to a
//!   throwaway artifact purely to confirm well-formedness
//!
//! Each adapter returns a binary success/failure signal; tool output is
//! captured into the error on failure.

use anyhow::Result;
use std::path::Path;
use tempfile::tempdir;

use super::command::ToolCommand;

/// Binary that builds a staged package directory into an artifact.
pub const COMPONENT_BUILDER: &str = "wkg";

/// Binary that generates binding documentation from a staged package.
pub const BINDING_VALIDATOR: &str = "wit-bindgen";

/// Binary used for the component-compile well-formedness check.
pub const COMPILE_CHECKER: &str = "wasm-tools";

/// Build the package rooted at `package_dir` into a binary artifact at
/// `artifact`.
pub async fn build_component(package_dir: &Path, artifact: &Path) -> Result<()> {
    ToolCommand::new(COMPONENT_BUILDER)
        .args(["wit", "build", "--wit-dir"])
        .arg(package_dir.display().to_string())
        .args(["--output"])
        .arg(artifact.display().to_string())
        .execute_success()
        .await
}

/// Generate binding documentation for the package rooted at `package_dir`
/// into `out_dir`.
pub async fn generate_binding_docs(package_dir: &Path, out_dir: &Path) -> Result<()> {
    ToolCommand::new(BINDING_VALIDATOR)
        .arg("markdown")
        .arg(package_dir.display().to_string())
        .args(["--out-dir"])
        .arg(out_dir.display().to_string())
        .execute_success()
        .await
}

/// Compile the package rooted at `package_dir` to a temporary artifact
/// that is immediately discarded; succeeds iff the package is well formed.
pub async fn check_component_compiles(package_dir: &Path) -> Result<()> {
    let scratch = tempdir()?;
    let artifact = scratch.path().join("check.wasm");
    ToolCommand::new(COMPILE_CHECKER)
        .args(["component", "wit"])
        .arg(package_dir.display().to_string())
        .args(["--wasm", "--output"])
        .arg(artifact.display().to_string())
        .execute_success()
        .await
}
