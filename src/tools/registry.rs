//! OCI registry client
//!
//! Publishing delegates registry mechanics to the external `oras` binary:
//! one `login` before the batch loop, then one `push` per artifact. The
//! session established by the login is the only resource shared across
//! files in a publish run, and it is neither refreshed nor retried
//! mid-batch.

use anyhow::Result;
use std::path::Path;

use super::command::{ToolCommand, ToolOutput};
use crate::reference::PackageReference;

/// Binary used for registry login and artifact push.
pub const REGISTRY_CLIENT: &str = "oras";

/// Fixed repository segment between the account and the package namespace.
pub const REPOSITORY_PREFIX: &str = "wit";

/// Registry host used when neither flag nor configuration names one.
pub const DEFAULT_REGISTRY: &str = "ghcr.io";

/// Media type recorded for pushed WIT package artifacts.
const ARTIFACT_TYPE: &str = "application/vnd.wasm.component.v1+wasm";

/// Authenticated client for one registry host.
pub struct RegistryClient {
    registry: String,
    account: String,
    token: String,
}

impl RegistryClient {
    /// Create a client for `registry`, authenticating as `account`.
    pub fn new(
        registry: impl Into<String>,
        account: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            registry: registry.into(),
            account: account.into(),
            token: token.into(),
        }
    }

    /// Destination image reference for a package:
    /// `<registry>/<account>/wit/<namespace>/<name>:<version-or-latest>`.
    #[must_use]
    pub fn image_reference(&self, reference: &PackageReference) -> String {
        format!(
            "{}/{}/{}/{}/{}:{}",
            self.registry,
            self.account,
            REPOSITORY_PREFIX,
            reference.namespace,
            reference.name,
            reference.version_or_latest()
        )
    }

    /// Log in to the registry. Performed once, before the publish loop.
    pub async fn login(&self) -> Result<()> {
        tracing::info!("logging in to {} as {}", self.registry, self.account);
        ToolCommand::new(REGISTRY_CLIENT)
            .arg("login")
            .arg(&self.registry)
            .args(["--username"])
            .arg(&self.account)
            .args(["--password"])
            .arg(&self.token)
            .execute_success()
            .await
    }

    /// Push `artifact` to `image`, returning the captured tool output.
    pub async fn push(&self, image: &str, artifact: &Path) -> Result<ToolOutput> {
        tracing::info!("pushing {} to {image}", artifact.display());
        ToolCommand::new(REGISTRY_CLIENT)
            .arg("push")
            .args(["--artifact-type", ARTIFACT_TYPE])
            .arg(image)
            .arg(artifact.display().to_string())
            .execute()
            .await
    }
}
