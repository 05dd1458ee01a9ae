//! Staging pipeline integration tests
//!
//! Drives discovery, staging, and the dry-run package pipeline over
//! fixture source trees, asserting the on-disk layout the external tools
//! would see.

use anyhow::Result;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

use witpkg_cli::pipeline::{self, is_excluded};
use witpkg_cli::config::PipelineConfig;
use witpkg_cli::source::{self, SourceFile};
use witpkg_cli::staging;

fn write_wit(root: &Path, file: &str, contents: &str) {
    fs::write(root.join(file), contents).unwrap();
}

fn load(root: &Path, file: &str) -> SourceFile {
    SourceFile::load(&root.join(file), root).unwrap()
}

#[test]
fn staged_tree_matches_expected_layout() -> Result<()> {
    let temp = tempdir()?;
    let root = temp.path();
    write_wit(
        root,
        "a-pkg@1.0.wit",
        "package a:pkg@1.0;\n\nuse b:pkg/iface@2.0;\n\nworld app {}\n",
    );
    write_wit(
        root,
        "b-pkg@2.0.wit",
        "package b:pkg@2.0;\n\nuse c:util/types@0.1.0;\n",
    );
    write_wit(root, "c-util@0.1.0.wit", "package c:util@0.1.0;\n");

    let staged = staging::stage(&load(root, "a-pkg@1.0.wit"), root)?;
    let staged_root = staged.path();

    assert!(staged_root.join("package.wit").is_file());
    let b_dir = staged_root.join("deps").join("b-pkg-2.0");
    assert!(b_dir.join("package.wit").is_file());
    let c_dir = b_dir.join("deps").join("c-util-0.1.0");
    assert!(c_dir.join("package.wit").is_file());

    // The staged copies carry the original contents.
    let b_contents = fs::read_to_string(b_dir.join("package.wit"))?;
    assert!(b_contents.contains("package b:pkg@2.0;"));
    Ok(())
}

#[test]
fn excluded_package_still_appears_as_dependency() -> Result<()> {
    let temp = tempdir()?;
    let root = temp.path();
    write_wit(
        root,
        "greentic-adapter@0.1.0.wit",
        "package greentic:adapter@0.1.0;\n\nuse wasix:mcp/server@0.0.5;\n",
    );
    write_wit(root, "wasix-mcp@0.0.5.wit", "package wasix:mcp@0.0.5;\n");

    let source = load(root, "greentic-adapter@0.1.0.wit");
    assert!(!is_excluded(&source.reference));

    let staged = staging::stage(&source, root)?;
    let mcp_dir = staged.path().join("deps").join("wasix-mcp-0.0.5");
    assert!(mcp_dir.join("package.wit").is_file());

    // The dependency itself is excluded from build and publish.
    let mcp = load(root, "wasix-mcp@0.0.5.wit");
    assert!(is_excluded(&mcp.reference));
    Ok(())
}

#[test]
fn discovery_includes_world_files_one_level_down() -> Result<()> {
    let temp = tempdir()?;
    let root = temp.path();
    write_wit(root, "a-pkg@1.0.wit", "package a:pkg@1.0;\n");
    let world_dir = root.join("wasix-mcp-0.0.5");
    fs::create_dir(&world_dir)?;
    fs::write(world_dir.join("world.wit"), "package wasix:mcp@0.0.5;\nworld mcp {}\n")?;

    let files = source::discover(root)?;
    assert_eq!(files.len(), 2);

    let world = SourceFile::load(&world_dir.join("world.wit"), root).unwrap();
    assert!(world.is_world());
    assert_eq!(world.package_dir(), Some(world_dir.as_path()));
    Ok(())
}

#[tokio::test]
async fn dry_run_package_batch_isolates_per_file_failures() -> Result<()> {
    let temp = tempdir()?;
    let root = temp.path();
    write_wit(root, "a-pkg@1.0.wit", "package a:pkg@1.0;\n\nuse b:pkg/iface@2.0;\n");
    write_wit(root, "b-pkg@2.0.wit", "package b:pkg@2.0;\n");
    write_wit(root, "c-pkg@1.0.wit", "world missing-declaration {}\n");

    let config = PipelineConfig {
        wit_root: root.to_path_buf(),
        out_dir: root.join("out"),
        dry_run: true,
    };

    let result = pipeline::run_package(&config).await?;
    assert_eq!(result.succeeded(), 2);
    assert_eq!(result.failures().len(), 1);
    assert!(result.failures()[0].path.ends_with("c-pkg@1.0.wit"));
    assert!(result.ensure_success("package").is_err());
    Ok(())
}
