//! witpkg - WIT interface package pipeline
//!
//! A CLI that resolves, stages, packages, validates, and publishes WIT
//! interface-definition files into deployable binary artifacts on an
//! OCI-compatible registry.
//!
//! # Architecture Overview
//!
//! The input is a flat directory of WIT files, each declaring a
//! namespaced, versioned package (`package wasix:mcp@0.0.5;`) and
//! referencing other packages through versioned `use`/`import`
//! declarations. Downstream tools want each package as a self-contained
//! directory tree, so the core of the crate is the staging pipeline:
//!
//! 1. [`reference`] parses package declarations and extracts dependency
//!    references (exact `namespace:name@version` identity - no semver).
//! 2. [`resolver`] recursively materializes a package's transitive
//!    dependency tree on disk, with an explicit visited set terminating
//!    cycles and collapsing diamonds.
//! 3. [`staging`] assembles the ephemeral per-file directory
//!    (`package.wit` + `deps/`) handed to the external tools, removed
//!    again on every exit path.
//! 4. [`pipeline`] drives the three batch operations - package, validate,
//!    publish - isolating per-file failures and aggregating them into a
//!    single exit code.
//!
//! # Core Modules
//!
//! - [`cli`] - clap-based command-line interface (`package`, `validate`,
//!   `publish`)
//! - [`config`] - explicit per-run configuration structs and the optional
//!   global config file
//! - [`core`] - error types and user-facing error presentation
//! - [`pipeline`] - batch drivers and result aggregation
//! - [`reference`] - package references, sanitization, and WIT parsing
//! - [`resolver`] - transitive dependency materialization
//! - [`source`] - source file discovery and world-file classification
//! - [`staging`] - ephemeral staging directories
//! - [`tools`] - external tool adapters (`wkg`, `wit-bindgen`,
//!   `wasm-tools`, `oras`)
//! - [`utils`] - file system helpers and progress output
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Build every package under ./wit into ./target/wit
//! witpkg package
//!
//! # Validate all packages without producing artifacts
//! witpkg validate
//!
//! # Build and push to ghcr.io
//! WITPKG_REGISTRY_ACCOUNT=me WITPKG_REGISTRY_TOKEN=... witpkg publish
//! ```
//!
//! Processing is strictly sequential: one file at a time, one staging
//! directory alive at a time, external tools awaited to completion with
//! no timeout. The exit code is the single source of truth for
//! automation: 0 when every file succeeded, 1 when any file failed or a
//! prerequisite was missing.

pub mod cli;
pub mod config;
pub mod core;
pub mod pipeline;
pub mod reference;
pub mod resolver;
pub mod source;
pub mod staging;
pub mod tools;
pub mod utils;
