//! Pipeline drivers: package, validate, publish
//!
//! The three drivers share one shape: discover every WIT source file under
//! the root (or one level below it), process each file in sequence, and
//! aggregate per-file outcomes into a [`BatchResult`]. A single file's
//! failure never halts the remaining files; run-level prerequisites
//! (external binaries, credentials) are checked before any file is
//! touched and abort the whole run.
//!
//! Per run: `Discover -> {Skip | Stage -> ExternalTool -> Record}* ->
//! Aggregate -> Exit(0|1)`. Nothing persists across runs and no step is
//! resumable.
//!
//! # Excluded packages
//!
//! Packages vendored from upstream (`wasix:mcp@0.0.5`) are never built or
//! pushed here. They are still perfectly valid *dependencies*: other
//! packages' staging trees may contain them.

use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tempfile::tempdir;

use crate::config::{PipelineConfig, PublishConfig};
use crate::reference::PackageReference;
use crate::source::{self, SourceFile};
use crate::staging;
use crate::tools::{self, RegistryClient, component, registry};
use crate::utils::{BatchProgress, ensure_dir};

/// Canonical references of packages that must never be locally rebuilt or
/// published.
pub const EXCLUDED_PACKAGE_REFS: &[&str] = &["wasix:mcp@0.0.5"];

static EXCLUDED_PACKAGES: LazyLock<Vec<PackageReference>> = LazyLock::new(|| {
    EXCLUDED_PACKAGE_REFS
        .iter()
        .map(|reference| reference.parse().expect("excluded package references are valid"))
        .collect()
});

/// Whether `reference` belongs to the excluded-package set.
#[must_use]
pub fn is_excluded(reference: &PackageReference) -> bool {
    EXCLUDED_PACKAGES.contains(reference)
}

/// One file's recorded failure.
#[derive(Debug)]
pub struct FileFailure {
    /// The offending source file
    pub path: PathBuf,
    /// Human-readable description of what went wrong
    pub message: String,
}

/// Accumulated outcome of one batch run.
///
/// The batch succeeds iff no file failed; skipped files (excluded
/// packages) never count against success.
#[derive(Debug, Default)]
pub struct BatchResult {
    succeeded: usize,
    skipped: usize,
    failures: Vec<FileFailure>,
}

impl BatchResult {
    /// Record a successfully processed file.
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    /// Record an intentionally skipped file.
    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Record a failed file, printing the failure line to stderr.
    pub fn record_failure(&mut self, path: &Path, message: impl Into<String>) {
        let message = message.into();
        eprintln!("{} {}: {message}", "✗".red().bold(), path.display());
        self.failures.push(FileFailure {
            path: path.to_path_buf(),
            message,
        });
    }

    /// Whether every processed file succeeded or was skipped.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of files that succeeded.
    #[must_use]
    pub const fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// Number of files that were skipped.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// The recorded failures.
    #[must_use]
    pub fn failures(&self) -> &[FileFailure] {
        &self.failures
    }

    /// Print a one-line summary for the finished batch.
    pub fn print_summary(&self, operation: &str) {
        let failed = self.failures.len();
        if failed == 0 {
            println!(
                "{operation}: {} succeeded, {} skipped",
                self.succeeded.to_string().green(),
                self.skipped
            );
        } else {
            println!(
                "{operation}: {} succeeded, {} skipped, {} failed",
                self.succeeded,
                self.skipped,
                failed.to_string().red().bold()
            );
        }
    }

    /// Turn an unsuccessful batch into an error for the process exit code.
    pub fn ensure_success(&self, operation: &str) -> Result<()> {
        if self.is_success() {
            return Ok(());
        }
        anyhow::bail!(
            "{operation} failed for {} of {} file(s)",
            self.failures.len(),
            self.succeeded + self.skipped + self.failures.len()
        )
    }
}

/// Run the package pipeline: stage every discovered file and build each
/// into a binary artifact under the configured output directory.
///
/// In dry-run mode discovery, parsing, and staging still happen (so
/// resolution errors produce the same verdict as a real run), but the
/// component builder is never invoked, the output directory is not
/// created, and the prerequisite check is skipped.
pub async fn run_package(config: &PipelineConfig) -> Result<BatchResult> {
    if !config.dry_run {
        tools::ensure_available(component::COMPONENT_BUILDER)?;
    }

    let files = source::discover(&config.wit_root)?;
    let mut result = BatchResult::default();
    if files.is_empty() {
        println!("No WIT source files found under {}", config.wit_root.display());
        return Ok(result);
    }

    if !config.dry_run {
        ensure_dir(&config.out_dir)?;
    }

    let progress = BatchProgress::new(files.len() as u64);
    for path in &files {
        progress.set_message(display_name(path, &config.wit_root));
        package_one(config, path, &mut result).await;
        progress.inc();
    }
    progress.finish_and_clear();

    result.print_summary("package");
    Ok(result)
}

async fn package_one(config: &PipelineConfig, path: &Path, result: &mut BatchResult) {
    let source = match SourceFile::load(path, &config.wit_root) {
        Ok(source) => source,
        Err(error) => {
            result.record_failure(path, error.to_string());
            return;
        }
    };

    if is_excluded(&source.reference) {
        println!("  {} {} is vendored upstream, skipping", "-".dimmed(), source.reference);
        result.record_skip();
        return;
    }

    let artifact = config.out_dir.join(format!("{}.wasm", source.reference.sanitized()));

    // World directories are already complete package roots; everything
    // else is staged with its dependency tree first.
    let built = if let Some(package_dir) = source.package_dir() {
        build_package(config, &source, package_dir, &artifact).await
    } else {
        match staging::stage(&source, &config.wit_root) {
            Ok(staged) => build_package(config, &source, staged.path(), &artifact).await,
            Err(error) => Err(error),
        }
    };

    match built {
        Ok(()) => result.record_success(),
        Err(error) => result.record_failure(path, format!("{error:#}")),
    }
}

async fn build_package(
    config: &PipelineConfig,
    source: &SourceFile,
    package_dir: &Path,
    artifact: &Path,
) -> Result<()> {
    if config.dry_run {
        println!(
            "  would build {} from {} into {}",
            source.reference,
            package_dir.display(),
            artifact.display()
        );
        return Ok(());
    }
    component::build_component(package_dir, artifact).await?;
    tracing::info!("built {} -> {}", source.reference, artifact.display());
    Ok(())
}

/// Run the validate pipeline: stage every discovered file and run the two
/// independent checks (binding docs generation and a component-compile
/// check) against each staged tree.
pub async fn run_validate(wit_root: &Path) -> Result<BatchResult> {
    tools::ensure_available(component::BINDING_VALIDATOR)?;
    tools::ensure_available(component::COMPILE_CHECKER)?;

    let files = source::discover(wit_root)?;
    let mut result = BatchResult::default();
    if files.is_empty() {
        println!("No WIT source files found under {}", wit_root.display());
        return Ok(result);
    }

    let progress = BatchProgress::new(files.len() as u64);
    for path in &files {
        progress.set_message(display_name(path, wit_root));
        validate_one(wit_root, path, &mut result).await;
        progress.inc();
    }
    progress.finish_and_clear();

    result.print_summary("validate");
    Ok(result)
}

async fn validate_one(wit_root: &Path, path: &Path, result: &mut BatchResult) {
    let source = match SourceFile::load(path, wit_root) {
        Ok(source) => source,
        Err(error) => {
            result.record_failure(path, error.to_string());
            return;
        }
    };

    if is_excluded(&source.reference) {
        println!("  {} {} is vendored upstream, skipping", "-".dimmed(), source.reference);
        result.record_skip();
        return;
    }

    let checked = if let Some(package_dir) = source.package_dir() {
        check_package(package_dir).await
    } else {
        match staging::stage(&source, wit_root) {
            Ok(staged) => check_package(staged.path()).await,
            Err(error) => Err(error),
        }
    };

    match checked {
        Ok(()) => result.record_success(),
        Err(error) => result.record_failure(path, format!("{error:#}")),
    }
}

/// Run both validation checks, reporting every failure rather than the
/// first one.
async fn check_package(package_dir: &Path) -> Result<()> {
    let docs_scratch = tempdir()?;
    let docs = component::generate_binding_docs(package_dir, docs_scratch.path()).await;
    let compile = component::check_component_compiles(package_dir).await;

    match (docs, compile) {
        (Ok(()), Ok(())) => Ok(()),
        (Err(error), Ok(())) | (Ok(()), Err(error)) => Err(error),
        (Err(docs_error), Err(compile_error)) => {
            anyhow::bail!("{docs_error:#}; {compile_error:#}")
        }
    }
}

/// Run the publish loop: push the pre-built artifact for every discovered
/// file to the registry.
///
/// Dependencies are not re-derived here - only the package declaration is
/// read. Login happens once before the loop; in dry-run mode neither
/// login nor push is performed and the prerequisite check is skipped.
pub async fn run_publish(config: &PublishConfig) -> Result<BatchResult> {
    let client = RegistryClient::new(&config.registry, &config.account, &config.token);

    if !config.dry_run {
        tools::ensure_available(registry::REGISTRY_CLIENT)?;
        client.login().await?;
    }

    let files = source::discover(&config.wit_root)?;
    let mut result = BatchResult::default();
    if files.is_empty() {
        println!("No WIT source files found under {}", config.wit_root.display());
        return Ok(result);
    }

    for path in &files {
        publish_one(config, &client, path, &mut result).await;
    }

    result.print_summary("publish");
    Ok(result)
}

async fn publish_one(
    config: &PublishConfig,
    client: &RegistryClient,
    path: &Path,
    result: &mut BatchResult,
) {
    let source = match SourceFile::load(path, &config.wit_root) {
        Ok(source) => source,
        Err(error) => {
            result.record_failure(path, error.to_string());
            return;
        }
    };

    if is_excluded(&source.reference) {
        println!("  {} {} is vendored upstream, skipping", "-".dimmed(), source.reference);
        result.record_skip();
        return;
    }

    let artifact = config.out_dir.join(format!("{}.wasm", source.reference.sanitized()));
    let image = client.image_reference(&source.reference);

    // When the package step ran in the same dry-run, artifacts were only
    // "would-built"; requiring them to exist would fail every file. With
    // --skip-package (or a real run) a missing artifact is a genuine error.
    let artifact_expected = config.skip_package || !config.dry_run;
    if artifact_expected && !artifact.is_file() {
        result.record_failure(
            path,
            format!(
                "missing artifact {} (build it with 'witpkg package' or drop --skip-package)",
                artifact.display()
            ),
        );
        return;
    }

    if config.dry_run {
        println!("  would push {} to {image}", artifact.display());
        result.record_success();
        return;
    }

    match client.push(&image, &artifact).await {
        Ok(output) => {
            if !output.stdout.trim().is_empty() {
                tracing::debug!(target: "tool", "{}", output.stdout.trim());
            }
            println!("  {} pushed {image}", "✓".green());
            result.record_success();
        }
        Err(error) => result.record_failure(path, format!("{error:#}")),
    }
}

fn display_name(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
