//! Harness error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::variation::GeneratorKind;
use crate::generator::FailureDescriptor;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error raised by a harness phase.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// One or more generation requests in a batch failed.
    #[error("{} of the {kind} variations failed to generate", .failures.len())]
    GenerationFailure {
        kind: GeneratorKind,
        /// `(variation name, failures reported for it)`
        failures: Vec<(String, Vec<FailureDescriptor>)>,
    },

    #[error("cannot back up `{}`: {reason}", .path.display())]
    BackupFailure {
        path: PathBuf,
        backup: PathBuf,
        reason: String,
    },

    #[error("cannot restore `{}`: {reason}", .path.display())]
    RestoreFailure { path: PathBuf, reason: String },

    #[error("{gate} failed (exit code {})", .code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    ToolFailure { gate: String, code: Option<i32> },

    #[error("duplicate {kind} variation `{name}` at `{path}`")]
    DuplicateVariation {
        kind: GeneratorKind,
        name: String,
        path: String,
    },
}

impl HarnessError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            HarnessError::GenerationFailure { kind, failures } => {
                let mut diag = Diagnostic::error(self.to_string());
                for (name, reported) in failures {
                    for failure in reported {
                        diag = diag.with_context(format!("{}: {}", name, failure));
                    }
                }
                diag.with_suggestion(format!(
                    "Re-run with `gencheck run --only {} --verbose --keep` to inspect the output",
                    kind
                ))
            }

            HarnessError::BackupFailure { path, backup, .. } => {
                let mut diag = Diagnostic::error(self.to_string()).with_location(path);
                if backup.exists() {
                    diag = diag.with_suggestion(suggestions::STALE_BACKUP);
                }
                diag
            }

            HarnessError::RestoreFailure { path, .. } => {
                Diagnostic::error(self.to_string()).with_location(path)
            }

            HarnessError::ToolFailure { .. } => Diagnostic::error(self.to_string())
                .with_suggestion(suggestions::GATE_FAILED),

            HarnessError::DuplicateVariation { .. } => Diagnostic::error(self.to_string())
                .with_context("variations must be unique by (path, name) within one kind"),
        }
    }
}
