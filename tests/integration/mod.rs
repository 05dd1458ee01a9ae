//! Integration test suite for witpkg
//!
//! End-to-end tests exercising the CLI binary and the staging pipeline
//! against real fixture trees. External toolchain binaries (`wkg`,
//! `wit-bindgen`, `wasm-tools`, `oras`) are not assumed to be installed;
//! everything here runs through dry-run modes and the library's staging
//! layer, which are tool-free by design.

mod cli;
mod staging;
