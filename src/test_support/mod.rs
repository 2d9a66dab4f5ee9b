//! Test utilities and mocks for gencheck unit tests.
//!
//! This module provides mock implementations of the two external seams a
//! run depends on: the code generator and the gate command runner.
//!
//! # Example
//!
//! ```rust,ignore
//! use gencheck::test_support::{MockGenerator, MockRunner};
//!
//! #[test]
//! fn test_example() {
//!     let generator = MockGenerator::new().fail("GeneratorTestingComponent3", "x");
//!     let runner = MockRunner::new().exit("yarn run lint", 1);
//!
//!     // Use mocks in tests...
//! }
//! ```

pub mod fixtures;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};

use crate::core::variation::{GeneratorKind, VariationSpec};
use crate::generator::{
    Change, FailureDescriptor, Generator, GeneratorOutput, PendingGeneration,
};
use crate::ops::generate::output_dir;
use crate::ops::verify::CommandRunner;

// Re-export fixtures for convenience
pub use fixtures::*;

type EventLog = Arc<Mutex<Vec<String>>>;

fn record(log: &EventLog, event: String) {
    if let Ok(mut events) = log.lock() {
        events.push(event);
    }
}

/// Scripted generator.
///
/// Every variation succeeds unless told otherwise. Launches and waits are
/// recorded so tests can check scheduling order.
#[derive(Debug, Default)]
pub struct MockGenerator {
    failing: HashMap<String, String>,
    refused: HashSet<String>,
    output_base: Option<PathBuf>,
    touched_file: Option<PathBuf>,
    events: EventLog,
}

impl MockGenerator {
    /// Create a generator where every variation succeeds.
    pub fn new() -> Self {
        MockGenerator::default()
    }

    /// Make the named variation report a failure with `message`.
    pub fn fail(mut self, name: &str, message: &str) -> Self {
        self.failing.insert(name.to_string(), message.to_string());
        self
    }

    /// Make launching the named variation itself error out.
    pub fn refuse(mut self, name: &str) -> Self {
        self.refused.insert(name.to_string());
        self
    }

    /// Write a file into each successful variation's output directory.
    pub fn writing_to(mut self, base: impl AsRef<Path>) -> Self {
        self.output_base = Some(base.as_ref().to_path_buf());
        self
    }

    /// Append a line to `path` for each successful slice variation.
    pub fn mutating(mut self, path: impl AsRef<Path>) -> Self {
        self.touched_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Recorded `launch <name>` / `wait <name>` events.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl Generator for MockGenerator {
    fn launch(&self, spec: &VariationSpec) -> Result<Box<dyn PendingGeneration>> {
        record(&self.events, format!("launch {}", spec.name()));
        if self.refused.contains(spec.name()) {
            bail!("generator for `{}` could not start", spec.name());
        }

        Ok(Box::new(MockPending {
            spec: spec.clone(),
            failure: self.failing.get(spec.name()).cloned(),
            output_dir: self.output_base.as_ref().map(|base| output_dir(base, spec)),
            touched_file: self
                .touched_file
                .clone()
                .filter(|_| spec.kind() == GeneratorKind::Slice),
            events: Arc::clone(&self.events),
        }))
    }
}

struct MockPending {
    spec: VariationSpec,
    failure: Option<String>,
    output_dir: Option<PathBuf>,
    touched_file: Option<PathBuf>,
    events: EventLog,
}

impl PendingGeneration for MockPending {
    fn wait(self: Box<Self>) -> Result<GeneratorOutput> {
        record(&self.events, format!("wait {}", self.spec.name()));

        if let Some(message) = self.failure {
            return Ok(GeneratorOutput::failures(vec![FailureDescriptor::message(
                message,
            )]));
        }

        let mut changes = Vec::new();
        if let Some(dir) = self.output_dir {
            fs::create_dir_all(&dir)?;
            let file = dir.join("index.ts");
            fs::write(&file, format!("// {}\n", self.spec.name()))?;
            changes.push(Change {
                kind: "add".to_string(),
                path: file.display().to_string(),
            });
        }
        if let Some(path) = self.touched_file {
            let mut contents = fs::read_to_string(&path)?;
            contents.push_str(&format!("// {}\n", self.spec.name()));
            fs::write(&path, contents)?;
            changes.push(Change {
                kind: "modify".to_string(),
                path: path.display().to_string(),
            });
        }

        Ok(GeneratorOutput::changes(changes))
    }
}

/// Pattern for matching command lines in MockRunner.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
        }
    }
}

/// Scripted gate runner. Unknown commands exit 0.
#[derive(Debug, Default)]
pub struct MockRunner {
    exits: Vec<(CommandPattern, i32)>,
    unavailable: Vec<CommandPattern>,
    observed: Option<PathBuf>,
    calls: Mutex<Vec<String>>,
    observations: Mutex<Vec<bool>>,
}

impl MockRunner {
    /// Create a runner where every command succeeds.
    pub fn new() -> Self {
        MockRunner::default()
    }

    /// Make the exact command exit with `code`.
    pub fn exit(mut self, cmd: &str, code: i32) -> Self {
        self.exits
            .push((CommandPattern::Exact(cmd.to_string()), code));
        self
    }

    /// Make commands matching `pattern` exit with `code`.
    pub fn exit_matching(mut self, pattern: CommandPattern, code: i32) -> Self {
        self.exits.push((pattern, code));
        self
    }

    /// Make the exact command fail to start.
    pub fn unavailable(mut self, cmd: &str) -> Self {
        self.unavailable
            .push(CommandPattern::Exact(cmd.to_string()));
        self
    }

    /// Record whether `path` exists each time a command runs.
    pub fn observing(mut self, path: impl AsRef<Path>) -> Self {
        self.observed = Some(path.as_ref().to_path_buf());
        self
    }

    /// Commands run so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Existence of the observed path at each call.
    pub fn observations(&self) -> Vec<bool> {
        self.observations.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, command_line: &str, _silent: bool) -> Result<Option<i32>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command_line.to_string());
        }
        if let (Some(path), Ok(mut observations)) = (&self.observed, self.observations.lock()) {
            observations.push(path.exists());
        }

        if self.unavailable.iter().any(|p| p.matches(command_line)) {
            bail!("failed to spawn `{}`", command_line);
        }

        let code = self
            .exits
            .iter()
            .find(|(pattern, _)| pattern.matches(command_line))
            .map(|(_, code)| *code)
            .unwrap_or(0);
        Ok(Some(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_generator_writes_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        let generator = MockGenerator::new().writing_to(tmp.path());
        let spec = VariationSpec::new(GeneratorKind::Component, "Button", "/components");

        let output = generator.launch(&spec).unwrap().wait().unwrap();
        assert_eq!(output.changes.len(), 1);
        assert!(tmp.path().join("components/Button/index.ts").exists());
    }

    #[test]
    fn test_mock_runner_patterns() {
        let runner = MockRunner::new()
            .exit_matching(CommandPattern::StartsWith("yarn run lint".to_string()), 1)
            .unavailable("tsc");

        assert_eq!(runner.run("yarn run lint --fix", false).unwrap(), Some(1));
        assert_eq!(runner.run("yarn run checkTs", false).unwrap(), Some(0));
        assert!(runner.run("tsc", false).is_err());
        assert_eq!(runner.calls().len(), 3);
    }
}
