//! External tool integration
//!
//! Everything the pipeline shells out to lives here:
//!
//! - [`command`] - the [`ToolCommand`](command::ToolCommand) builder all
//!   invocations go through
//! - [`component`] - component builder, binding validator, and compile
//!   checker adapters
//! - [`registry`] - the OCI registry client (`oras` login/push)
//!
//! [`ensure_available`] is the run-level prerequisite check: it is called
//! once per required binary before any file is processed, so a missing
//! tool aborts the run without side effects.

pub mod command;
pub mod component;
pub mod registry;

pub use command::{ToolCommand, ToolOutput};
pub use registry::RegistryClient;

use anyhow::Result;

use crate::core::WitpkgError;

/// Verify that `tool` is present on `PATH`.
///
/// # Errors
///
/// [`WitpkgError::ToolNotFound`] - fatal to the run, checked before any
/// file is touched.
pub fn ensure_available(tool: &str) -> Result<()> {
    which::which(tool).map_err(|_| WitpkgError::ToolNotFound {
        tool: tool.to_string(),
    })?;
    Ok(())
}
