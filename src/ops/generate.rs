//! Generation driver.
//!
//! Runs the external generator for single variations or whole batches and
//! turns each outcome into a [`GenerationResult`]. A batch also yields the
//! cleanup actions that remove what it generated.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::variation::{GeneratorKind, VariationSpec};
use crate::generator::{
    FailureDescriptor, GenerationResult, Generator, GeneratorOutput, PendingGeneration,
};
use crate::ops::cleanup::CleanupAction;
use crate::util::errors::HarnessError;
use crate::util::shell::{Shell, Status};

/// How the requests of one batch are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchMode {
    /// Launch every request before waiting on any of them.
    #[default]
    Concurrent,
    /// Launch each request only after the previous one settled.
    Sequential,
}

impl std::str::FromStr for BatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "concurrent" => Ok(BatchMode::Concurrent),
            "sequential" => Ok(BatchMode::Sequential),
            _ => Err(format!(
                "invalid batch mode '{}'; expected 'concurrent' or 'sequential'",
                s
            )),
        }
    }
}

impl std::fmt::Display for BatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchMode::Concurrent => write!(f, "concurrent"),
            BatchMode::Sequential => write!(f, "sequential"),
        }
    }
}

/// A variation together with its settled result.
#[derive(Debug, Clone)]
pub struct VariationOutcome {
    pub spec: VariationSpec,
    pub result: GenerationResult,
}

/// Everything a batch produced.
#[derive(Debug)]
pub struct BatchReport {
    pub kind: GeneratorKind,
    pub outcomes: Vec<VariationOutcome>,
    /// One directory removal per attempted variation, in spec order.
    pub cleanup: Vec<CleanupAction>,
}

impl BatchReport {
    /// Number of variations that generated successfully.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_success()).count()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_success())
    }

    /// Aggregate every failed variation into one error.
    pub fn failure(&self) -> Option<HarnessError> {
        let failures: Vec<_> = self
            .outcomes
            .iter()
            .filter(|o| !o.result.is_success())
            .map(|o| (o.spec.name().to_string(), o.result.failures().to_vec()))
            .collect();

        if failures.is_empty() {
            None
        } else {
            Some(HarnessError::GenerationFailure {
                kind: self.kind,
                failures,
            })
        }
    }
}

/// Directory a variation's output lands in.
///
/// Components get a directory named after themselves; slices always write
/// into a `slice` directory under their path.
pub fn output_dir(base: &Path, spec: &VariationSpec) -> PathBuf {
    let dir = base.join(spec.path().trim_start_matches(['/', '\\']));
    match spec.kind() {
        GeneratorKind::Component => dir.join(spec.name()),
        GeneratorKind::Slice => dir.join("slice"),
    }
}

/// Drives a generator and reports outcomes.
pub struct GenerationDriver<'a> {
    generator: &'a dyn Generator,
    shell: &'a Shell,
    base: PathBuf,
}

impl<'a> GenerationDriver<'a> {
    /// Create a driver whose generated output lands under `base`.
    pub fn new(generator: &'a dyn Generator, shell: &'a Shell, base: impl Into<PathBuf>) -> Self {
        GenerationDriver {
            generator,
            shell,
            base: base.into(),
        }
    }

    /// Generate a single variation and wait for its result.
    pub fn generate_one(&self, spec: &VariationSpec) -> GenerationResult {
        let pending = self.generator.launch(spec);
        self.settle(spec, pending)
    }

    /// Generate every variation in `specs`.
    ///
    /// In concurrent mode all requests are launched before any is awaited;
    /// the batch completes once every request has settled.
    pub fn generate_batch(
        &self,
        kind: GeneratorKind,
        specs: &[VariationSpec],
        mode: BatchMode,
    ) -> BatchReport {
        tracing::info!("generating {} {} variation(s) ({:?})", specs.len(), kind, mode);

        let results: Vec<GenerationResult> = match mode {
            BatchMode::Sequential => specs.iter().map(|spec| self.generate_one(spec)).collect(),
            BatchMode::Concurrent => {
                let launched: Vec<_> = specs
                    .iter()
                    .map(|spec| (spec, self.generator.launch(spec)))
                    .collect();
                launched
                    .into_iter()
                    .map(|(spec, pending)| self.settle(spec, pending))
                    .collect()
            }
        };

        let cleanup = specs
            .iter()
            .map(|spec| CleanupAction::RemoveDir {
                label: spec.name().to_string(),
                path: output_dir(&self.base, spec),
            })
            .collect();

        let outcomes = specs
            .iter()
            .cloned()
            .zip(results)
            .map(|(spec, result)| VariationOutcome { spec, result })
            .collect();

        BatchReport {
            kind,
            outcomes,
            cleanup,
        }
    }

    /// Wait for a launched request and classify its output.
    fn settle(
        &self,
        spec: &VariationSpec,
        pending: anyhow::Result<Box<dyn PendingGeneration>>,
    ) -> GenerationResult {
        let output = pending.and_then(|p| p.wait()).unwrap_or_else(|e| {
            GeneratorOutput::failures(vec![FailureDescriptor {
                kind: "launch".to_string(),
                error: Some(format!("{:#}", e)),
                ..Default::default()
            }])
        });

        let result = output.into_result();
        match &result {
            GenerationResult::Generated { changes } => {
                self.shell
                    .status(Status::Generated, format!("'{}'", spec.name()));
                tracing::debug!("{} applied {} change(s)", spec, changes.len());
            }
            GenerationResult::Failed { failures } => {
                self.shell.note(format!(
                    "'{}' reported {} failure(s)",
                    spec.name(),
                    failures.len()
                ));
            }
        }
        result
    }
}
