//! Verification gates.
//!
//! A gate is an external command (lint, type-check) whose exit status is
//! reduced to pass/fail. Gates are independent: each runs regardless of how
//! the previous one went.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use serde::Serialize;

use crate::util::errors::HarnessError;
use crate::util::process::ProcessBuilder;
use crate::util::shell::{format_duration, Shell, Status};

/// Executes shell command lines.
pub trait CommandRunner {
    /// Run `command_line` and return its exit code (`None` if killed by a signal).
    ///
    /// When `silent` is false the command's output streams straight to the
    /// console.
    fn run(&self, command_line: &str, silent: bool) -> Result<Option<i32>>;
}

/// Runs commands through the platform shell in a fixed directory.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    cwd: PathBuf,
}

impl ShellRunner {
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        ShellRunner {
            cwd: cwd.as_ref().to_path_buf(),
        }
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command_line: &str, silent: bool) -> Result<Option<i32>> {
        let process = ProcessBuilder::shell(command_line).cwd(&self.cwd);
        let status = if silent {
            process.exec()?.status
        } else {
            process.status()?
        };
        Ok(status.code())
    }
}

/// One external quality gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    /// Short name, e.g. `lint`
    pub name: String,
    /// Label used in pass/fail messages, e.g. `Linting`
    pub label: String,
    pub command: String,
}

impl Gate {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Gate {
            name: name.into(),
            label: label.into(),
            command: command.into(),
        }
    }

    /// The style/lint gate.
    pub fn lint(command: impl Into<String>) -> Self {
        Gate::new("lint", "Linting", command)
    }

    /// The type-soundness gate.
    pub fn typecheck(command: impl Into<String>) -> Self {
        Gate::new("typecheck", "Typescript", command)
    }
}

/// Result of one gate.
#[derive(Debug, Clone, Serialize)]
pub struct GateOutcome {
    pub name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(serialize_with = "serialize_duration_ms")]
    pub duration: Duration,
}

fn serialize_duration_ms<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

/// Runs gates and reports their outcome.
pub struct VerificationRunner<'a> {
    runner: &'a dyn CommandRunner,
    shell: &'a Shell,
}

impl<'a> VerificationRunner<'a> {
    pub fn new(runner: &'a dyn CommandRunner, shell: &'a Shell) -> Self {
        VerificationRunner { runner, shell }
    }

    /// Run one gate with live output. Non-zero exit is a `ToolFailure`.
    pub fn run_check(&self, gate: &Gate) -> Result<(), HarnessError> {
        self.shell.status(Status::Running, &gate.command);
        tracing::info!("running {} gate: {}", gate.name, gate.command);

        let code = self.runner.run(&gate.command, false).map_err(|e| {
            tracing::warn!("{} gate could not start: {:#}", gate.name, e);
            HarnessError::ToolFailure {
                gate: gate.name.clone(),
                code: None,
            }
        })?;

        match code {
            Some(0) => Ok(()),
            code => Err(HarnessError::ToolFailure {
                gate: gate.name.clone(),
                code,
            }),
        }
    }

    /// Run a gate, report it, and reduce it to an outcome. Never fails.
    pub fn check(&self, gate: &Gate) -> GateOutcome {
        let start = Instant::now();
        let result = self.run_check(gate);
        let duration = start.elapsed();

        match result {
            Ok(()) => {
                self.shell.status(
                    Status::Passed,
                    format!("{} test passed in {}", gate.label, format_duration(duration)),
                );
                GateOutcome {
                    name: gate.name.clone(),
                    passed: true,
                    error: None,
                    duration,
                }
            }
            Err(e) => {
                self.shell.status(Status::Failed, format!("{} failed: {}", gate.label, e));
                GateOutcome {
                    name: gate.name.clone(),
                    passed: false,
                    error: Some(e.to_string()),
                    duration,
                }
            }
        }
    }

    /// Run every gate in order; one failing gate never stops the next.
    pub fn check_all(&self, gates: &[Gate]) -> Vec<GateOutcome> {
        gates.iter().map(|gate| self.check(gate)).collect()
    }
}
