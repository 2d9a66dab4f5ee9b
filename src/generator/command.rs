//! Generator backed by an external command.
//!
//! The command receives the variation configuration as JSON on stdin and
//! prints a `{ "changes": [...], "failures": [...] }` object on stdout.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Child;

use anyhow::{anyhow, Context, Result};

use super::{FailureDescriptor, Generator, GeneratorOutput, PendingGeneration};
use crate::core::variation::{GeneratorKind, VariationSpec};
use crate::util::process::ProcessBuilder;

/// Runs one shell command per generator kind.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    commands: HashMap<GeneratorKind, String>,
    cwd: PathBuf,
}

impl CommandGenerator {
    /// Create a generator whose commands run in `cwd`.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        CommandGenerator {
            commands: HashMap::new(),
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    /// Register the command line for a kind.
    pub fn with_command(mut self, kind: GeneratorKind, command_line: impl Into<String>) -> Self {
        self.commands.insert(kind, command_line.into());
        self
    }

    /// The command line registered for a kind.
    pub fn command(&self, kind: GeneratorKind) -> Option<&str> {
        self.commands.get(&kind).map(String::as_str)
    }
}

impl Generator for CommandGenerator {
    fn launch(&self, spec: &VariationSpec) -> Result<Box<dyn PendingGeneration>> {
        let command_line = self
            .command(spec.kind())
            .ok_or_else(|| anyhow!("no generator command configured for `{}`", spec.kind()))?;

        let input = serde_json::to_vec(&spec.to_generator_input())
            .context("failed to serialize generator input")?;

        let process = ProcessBuilder::shell(command_line)
            .cwd(&self.cwd)
            .env("GENCHECK_KIND", spec.kind().as_str())
            .stdin(input);

        tracing::debug!("launching generator for {}: {}", spec, process.display_command());

        let child = process.spawn()?;
        Ok(Box::new(RunningCommand {
            child,
            command_line: command_line.to_string(),
        }))
    }
}

/// A generator process that has been spawned.
struct RunningCommand {
    child: Child,
    command_line: String,
}

impl PendingGeneration for RunningCommand {
    fn wait(self: Box<Self>) -> Result<GeneratorOutput> {
        let output = self
            .child
            .wait_with_output()
            .with_context(|| format!("failed to wait for `{}`", self.command_line))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let parsed = parse_output(&stdout);
        if output.status.success() {
            return parsed.with_context(|| {
                format!("`{}` did not print a generator result", self.command_line)
            });
        }

        // A failing exit code is always a failure, even if stdout disagrees.
        let mut result = parsed.unwrap_or_default();
        if result.failures.is_empty() {
            result.failures.push(FailureDescriptor {
                kind: "exit".to_string(),
                error: Some(format!(
                    "`{}` exited with code {:?}: {}",
                    self.command_line,
                    output.status.code(),
                    stderr.trim()
                )),
                ..Default::default()
            });
        }
        Ok(result)
    }
}

/// Parse generator stdout, tolerating log lines printed before the result.
fn parse_output(stdout: &str) -> Result<GeneratorOutput> {
    let trimmed = stdout.trim();
    if let Ok(output) = serde_json::from_str::<GeneratorOutput>(trimmed) {
        return Ok(output);
    }

    trimmed
        .lines()
        .rev()
        .map(str::trim)
        .filter(|line| line.starts_with('{'))
        .find_map(|line| serde_json::from_str::<GeneratorOutput>(line).ok())
        .ok_or_else(|| anyhow!("unrecognized generator output: {}", trimmed))
}
