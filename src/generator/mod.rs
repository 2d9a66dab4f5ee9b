//! External code generator interface.
//!
//! The generator is an external capability keyed by [`GeneratorKind`]: it
//! receives one variation's configuration and reports either the changes it
//! applied or the failures it hit. Its wire shape is the loose
//! `{ changes, failures }` object; callers only ever see the tagged
//! [`GenerationResult`].

pub mod command;

use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::variation::VariationSpec;

pub use command::CommandGenerator;

/// One file action the generator applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// Action type, e.g. `add` or `modify`
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Affected file
    #[serde(default)]
    pub path: String,
}

/// One failed generator action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FailureDescriptor {
    /// Action type that failed
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    /// File the action targeted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Error text as reported by the generator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Free-form message (some generators use this instead of `error`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FailureDescriptor {
    /// A failure carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        FailureDescriptor {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Best available description of what went wrong.
    pub fn reason(&self) -> &str {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .unwrap_or("unknown failure")
    }
}

impl fmt::Display for FailureDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.kind.is_empty() {
            write!(f, "[{}] ", self.kind)?;
        }
        if let Some(ref path) = self.path {
            write!(f, "{}: ", path)?;
        }
        f.write_str(self.reason())
    }
}

/// Raw generator output, as the external tool reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOutput {
    pub changes: Vec<Change>,
    pub failures: Vec<FailureDescriptor>,
}

impl GeneratorOutput {
    /// Successful output with the given changes.
    pub fn changes(changes: Vec<Change>) -> Self {
        GeneratorOutput {
            changes,
            failures: Vec::new(),
        }
    }

    /// Failed output with the given failures.
    pub fn failures(failures: Vec<FailureDescriptor>) -> Self {
        GeneratorOutput {
            changes: Vec::new(),
            failures,
        }
    }

    /// Classify the output. Any failure makes the whole result a failure.
    pub fn into_result(self) -> GenerationResult {
        if self.failures.is_empty() {
            GenerationResult::Generated {
                changes: self.changes,
            }
        } else {
            GenerationResult::Failed {
                failures: self.failures,
            }
        }
    }
}

/// Outcome of generating one variation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Generated { changes: Vec<Change> },
    Failed { failures: Vec<FailureDescriptor> },
}

impl GenerationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Generated { .. })
    }

    pub fn failures(&self) -> &[FailureDescriptor] {
        match self {
            GenerationResult::Generated { .. } => &[],
            GenerationResult::Failed { failures } => failures,
        }
    }
}

/// A code generator that can start work without waiting for it.
pub trait Generator {
    /// Start generating `spec`. The returned handle settles the request.
    fn launch(&self, spec: &VariationSpec) -> Result<Box<dyn PendingGeneration>>;
}

/// A generation request that has been started but not yet settled.
pub trait PendingGeneration {
    /// Block until the generator finishes and return its raw output.
    fn wait(self: Box<Self>) -> Result<GeneratorOutput>;
}
