//! Error handling for witpkg
//!
//! The error system is built around two types:
//! - [`WitpkgError`] - strongly-typed failure cases for precise handling in code
//! - [`ErrorContext`] - a presentation wrapper that adds suggestions and details
//!   for CLI users
//!
//! # Propagation policy
//!
//! Per-file errors ([`WitpkgError::MissingPackageDeclaration`],
//! [`WitpkgError::MissingDependency`], [`WitpkgError::ExternalToolFailure`])
//! are recorded in the batch result and never abort sibling files. Run-level
//! prerequisite errors ([`WitpkgError::ToolNotFound`],
//! [`WitpkgError::MissingCredentials`]) are fatal and raised before any file
//! is touched.
//!
//! Use [`user_friendly_error`] at the top level to turn any error chain into
//! a colored message with an actionable suggestion.

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for witpkg operations.
///
/// Each variant carries enough context to identify the offending file,
/// reference, or tool in user-facing output.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum WitpkgError {
    /// A source file has no identifiable `package` declaration.
    ///
    /// Recorded per file; the rest of the batch proceeds.
    #[error("no package declaration found in {}", path.display())]
    MissingPackageDeclaration {
        /// The file that was scanned
        path: PathBuf,
    },

    /// A referenced dependency has no corresponding source file on disk.
    ///
    /// Aborts only the staging of the file that referenced it.
    #[error("missing WIT source for dependency {reference} (expected {})", searched.display())]
    MissingDependency {
        /// Canonical reference of the dependency that could not be located
        reference: String,
        /// The deterministic location that was checked first
        searched: PathBuf,
    },

    /// A package reference string could not be parsed.
    #[error("invalid package reference: {input}")]
    InvalidPackageReference {
        /// The string that failed to parse
        input: String,
    },

    /// An external tool returned a non-zero exit status.
    #[error("{tool} {operation} failed: {stderr}")]
    ExternalToolFailure {
        /// Tool binary name (e.g. `wkg`, `oras`)
        tool: String,
        /// The subcommand or operation that was attempted
        operation: String,
        /// Captured standard error (or standard output when stderr is empty)
        stderr: String,
    },

    /// A required external tool binary is not on `PATH`.
    ///
    /// Fatal to the entire run; checked before any file is processed.
    #[error("required tool '{tool}' not found on PATH")]
    ToolNotFound {
        /// Tool binary name
        tool: String,
    },

    /// Registry credentials were not provided in the environment.
    ///
    /// Fatal to the entire publish run, before any login attempt.
    #[error("registry credentials missing: set {account_var} and {token_var}")]
    MissingCredentials {
        /// Environment variable holding the registry account
        account_var: String,
        /// Environment variable holding the registry token
        token_var: String,
    },

    /// A file system operation failed.
    #[error("file system error during {operation}: {path}")]
    FileSystemError {
        /// What was being attempted (e.g. "copy", "create directory")
        operation: String,
        /// The path involved
        path: String,
    },
}

/// Wrapper that pairs a [`WitpkgError`] with a user-facing suggestion.
///
/// Built by [`user_friendly_error`] and displayed by the binary's top-level
/// error handler.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying witpkg error
    pub error: WitpkgError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with no suggestion or details.
    #[must_use]
    pub const fn new(error: WitpkgError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attach a resolution suggestion shown after the error message.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach additional background details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with color.
    pub fn display(&self) {
        eprintln!("{} {}", "Error:".red().bold(), self.error);
        if let Some(details) = &self.details {
            eprintln!("\n{details}");
        }
        if let Some(suggestion) = &self.suggestion {
            eprintln!("\n{} {}", "Suggestion:".yellow().bold(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\n{details}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }
        Ok(())
    }
}

/// Convert any error chain into an [`ErrorContext`] with a suggestion
/// matched to the failure kind.
///
/// Unknown errors fall through to a generic context that preserves the
/// original message chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(witpkg_error) = error.downcast_ref::<WitpkgError>() {
        return create_error_context(witpkg_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        let context = ErrorContext::new(WitpkgError::FileSystemError {
            operation: "file access".to_string(),
            path: io_error.to_string(),
        });
        return match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => context
                .with_suggestion("Check file ownership or re-run with elevated permissions"),
            std::io::ErrorKind::NotFound => context
                .with_suggestion("Check that the file or directory exists and the path is correct"),
            _ => context,
        };
    }

    // Fall back to a generic context preserving the message chain
    let mut message = error.to_string();
    for cause in error.chain().skip(1) {
        message.push_str(&format!("\n  caused by: {cause}"));
    }
    ErrorContext::new(WitpkgError::FileSystemError {
        operation: "operation".to_string(),
        path: message,
    })
}

fn create_error_context(error: WitpkgError) -> ErrorContext {
    let (suggestion, details): (Option<String>, Option<String>) = match &error {
        WitpkgError::MissingPackageDeclaration { .. } => (
            Some(
                "Add a 'package namespace:name@version;' declaration at the top of the file"
                    .to_string(),
            ),
            None,
        ),
        WitpkgError::MissingDependency { reference, .. } => (
            Some(format!(
                "Add a WIT source file for {reference} to the source directory, or remove the reference"
            )),
            Some(
                "Dependencies are located by file name derived from the package reference, \
                 falling back to a scan of package declarations"
                    .to_string(),
            ),
        ),
        WitpkgError::ToolNotFound { tool } => {
            (Some(format!("Install '{tool}' and ensure it is on your PATH")), None)
        }
        WitpkgError::MissingCredentials { account_var, token_var } => (
            Some(format!("Export {account_var} and {token_var} before running 'witpkg publish'")),
            None,
        ),
        WitpkgError::ExternalToolFailure { tool, .. } => {
            (Some(format!("Inspect the captured {tool} output above for details")), None)
        }
        _ => (None, None),
    };

    ErrorContext {
        error,
        suggestion,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dependency_message_names_reference_and_path() {
        let error = WitpkgError::MissingDependency {
            reference: "wasix:mcp@0.0.5".to_string(),
            searched: PathBuf::from("wit/wasix-mcp@0.0.5.wit"),
        };
        let message = error.to_string();
        assert!(message.contains("wasix:mcp@0.0.5"));
        assert!(message.contains("wasix-mcp@0.0.5.wit"));
    }

    #[test]
    fn credentials_error_names_both_variables() {
        let error = WitpkgError::MissingCredentials {
            account_var: "WITPKG_REGISTRY_ACCOUNT".to_string(),
            token_var: "WITPKG_REGISTRY_TOKEN".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("WITPKG_REGISTRY_ACCOUNT"));
        assert!(message.contains("WITPKG_REGISTRY_TOKEN"));
    }

    #[test]
    fn user_friendly_error_attaches_suggestion_for_known_variants() {
        let context = user_friendly_error(anyhow::Error::from(WitpkgError::ToolNotFound {
            tool: "wkg".to_string(),
        }));
        assert!(context.suggestion.as_deref().unwrap_or_default().contains("wkg"));
    }

    #[test]
    fn error_context_display_includes_suggestion() {
        let context = ErrorContext::new(WitpkgError::ToolNotFound {
            tool: "oras".to_string(),
        })
        .with_suggestion("install oras");
        let rendered = format!("{context}");
        assert!(rendered.contains("oras"));
        assert!(rendered.contains("Suggestion: install oras"));
    }
}
