//! CLI end-to-end tests
//!
//! Runs the compiled `witpkg` binary against fixture trees. Dry-run modes
//! keep these tests independent of the external toolchain; credential
//! variables are injected or removed per invocation so the suite never
//! depends on the caller's environment.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const ACCOUNT_VAR: &str = "WITPKG_REGISTRY_ACCOUNT";
const TOKEN_VAR: &str = "WITPKG_REGISTRY_TOKEN";

fn witpkg(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("witpkg").unwrap();
    // Isolate from the caller's global config, credentials, and terminal.
    cmd.env("HOME", home)
        .env("WITPKG_NO_PROGRESS", "1")
        .env_remove(ACCOUNT_VAR)
        .env_remove(TOKEN_VAR)
        .env_remove("DRY_RUN");
    cmd
}

fn write_wit(root: &Path, file: &str, contents: &str) {
    fs::write(root.join(file), contents).unwrap();
}

#[test]
fn publish_without_credentials_fails_fast_even_in_dry_run() {
    let temp = tempdir().unwrap();

    witpkg(temp.path())
        .args(["publish", "--dry-run", "--skip-package"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(ACCOUNT_VAR))
        .stderr(predicate::str::contains(TOKEN_VAR));
}

#[test]
fn package_with_no_sources_is_an_informational_success() {
    let temp = tempdir().unwrap();
    let wit_dir = temp.path().join("wit");
    fs::create_dir(&wit_dir).unwrap();

    witpkg(temp.path())
        .args(["package", "--dry-run", "--wit-dir"])
        .arg(&wit_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No WIT source files found"));
}

#[test]
fn dry_run_package_builds_good_files_and_reports_the_bad_one() {
    let temp = tempdir().unwrap();
    let wit_dir = temp.path().join("wit");
    fs::create_dir(&wit_dir).unwrap();
    write_wit(&wit_dir, "a-pkg@1.0.wit", "package a:pkg@1.0;\n\nuse b:pkg/iface@2.0;\n");
    write_wit(&wit_dir, "b-pkg@2.0.wit", "package b:pkg@2.0;\n");
    write_wit(&wit_dir, "c-pkg@1.0.wit", "world missing-declaration {}\n");

    witpkg(temp.path())
        .args(["package", "--dry-run", "--wit-dir"])
        .arg(&wit_dir)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("would build a:pkg@1.0"))
        .stdout(predicate::str::contains("would build b:pkg@2.0"))
        .stderr(predicate::str::contains("c-pkg@1.0.wit"));
}

#[test]
fn dry_run_env_variable_enables_dry_run() {
    let temp = tempdir().unwrap();
    let wit_dir = temp.path().join("wit");
    fs::create_dir(&wit_dir).unwrap();
    write_wit(&wit_dir, "b-pkg@2.0.wit", "package b:pkg@2.0;\n");

    witpkg(temp.path())
        .env("DRY_RUN", "1")
        .args(["package", "--wit-dir"])
        .arg(&wit_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("would build b:pkg@2.0"));
}

#[test]
fn publish_dry_run_with_artifacts_prints_the_pushes() {
    let temp = tempdir().unwrap();
    let wit_dir = temp.path().join("wit");
    fs::create_dir(&wit_dir).unwrap();
    write_wit(&wit_dir, "b-pkg@2.0.wit", "package b:pkg@2.0;\n");

    let out_dir = temp.path().join("out");
    fs::create_dir(&out_dir).unwrap();
    fs::write(out_dir.join("b-pkg-2.0.wasm"), b"\0asm").unwrap();

    witpkg(temp.path())
        .env(ACCOUNT_VAR, "greentic")
        .env(TOKEN_VAR, "secret")
        .args(["publish", "--dry-run", "--skip-package", "--wit-dir"])
        .arg(&wit_dir)
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("would push"))
        .stdout(predicate::str::contains("ghcr.io/greentic/wit/b/pkg:2.0"));
}

#[test]
fn publish_dry_run_reports_genuinely_missing_artifacts() {
    let temp = tempdir().unwrap();
    let wit_dir = temp.path().join("wit");
    fs::create_dir(&wit_dir).unwrap();
    write_wit(&wit_dir, "b-pkg@2.0.wit", "package b:pkg@2.0;\n");

    witpkg(temp.path())
        .env(ACCOUNT_VAR, "greentic")
        .env(TOKEN_VAR, "secret")
        .args(["publish", "--dry-run", "--skip-package", "--wit-dir"])
        .arg(&wit_dir)
        .arg("--out-dir")
        .arg(temp.path().join("empty-out"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("missing artifact"));
}

#[test]
fn excluded_world_package_is_skipped_without_failure() {
    let temp = tempdir().unwrap();
    let wit_dir = temp.path().join("wit");
    fs::create_dir(&wit_dir).unwrap();
    let world_dir = wit_dir.join("wasix-mcp-0.0.5");
    fs::create_dir(&world_dir).unwrap();
    write_wit(&world_dir, "world.wit", "package wasix:mcp@0.0.5;\nworld mcp {}\n");

    witpkg(temp.path())
        .args(["package", "--dry-run", "--wit-dir"])
        .arg(&wit_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("wasix:mcp@0.0.5"))
        .stdout(predicate::str::contains("skipping"));
}
