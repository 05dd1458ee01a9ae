//! Core types and error handling for witpkg
//!
//! This module hosts the crate-wide error types. The strongly-typed
//! [`WitpkgError`] enum is used for failure cases the pipeline needs to
//! distinguish; [`ErrorContext`] and [`user_friendly_error`] turn any error
//! chain into colored, actionable CLI output.

pub mod error;

pub use error::{ErrorContext, WitpkgError, user_friendly_error};
