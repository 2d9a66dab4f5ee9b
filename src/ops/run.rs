//! Run orchestration.
//!
//! A run walks a fixed sequence of states:
//!
//! ```text
//! Idle -> GeneratingComponents -> GeneratingSlices -> Verifying -> CleaningUp -> Done
//! ```
//!
//! Each generation phase is isolated: its failure is reported and the run
//! moves on. Verification always runs, and cleanup always runs after it, so
//! the gates see every generated file and the working tree is left as it was
//! found.

use serde::Serialize;

use crate::core::variation::{check_unique, GeneratorKind};
use crate::generator::Generator;
use crate::ops::cleanup::{CleanupAction, CleanupRegistry, CleanupReport};
use crate::ops::generate::GenerationDriver;
use crate::ops::verify::{CommandRunner, Gate, GateOutcome, VerificationRunner};
use crate::util::context::HarnessContext;
use crate::util::diagnostic::Diagnostic;
use crate::util::errors::HarnessError;
use crate::util::process::{find_executable, leading_program};
use crate::util::shell::{Shell, Status};

/// Orchestrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunState {
    Idle,
    GeneratingComponents,
    GeneratingSlices,
    Verifying,
    CleaningUp,
    Done,
}

/// Knobs for a single run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Generate only this kind; the other phase is skipped.
    pub only: Option<GeneratorKind>,

    /// Do not run the verification gates. Unrun gates count as failed.
    pub skip_verify: bool,

    /// Leave generated directories in place. The root state is still restored.
    pub keep: bool,
}

impl RunOptions {
    fn wants(&self, kind: GeneratorKind) -> bool {
        self.only.map_or(true, |only| only == kind)
    }
}

/// Aggregate pass/fail of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub components_ok: bool,
    pub slices_ok: bool,
    pub lint_ok: bool,
    pub typecheck_ok: bool,
    /// Whether generation failures count against the exit status
    pub fail_on_generation_error: bool,
}

impl RunOutcome {
    pub fn generation_ok(&self) -> bool {
        self.components_ok && self.slices_ok
    }

    pub fn gates_ok(&self) -> bool {
        self.lint_ok && self.typecheck_ok
    }

    pub fn passed(&self) -> bool {
        self.gates_ok() && (self.generation_ok() || !self.fail_on_generation_error)
    }

    /// Process exit status: 0 on success, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub generated: usize,
    pub failed: usize,
    pub gates: Vec<GateOutcome>,
    pub cleanup: CleanupReport,
}

/// Sequences generation, verification and cleanup.
pub struct Orchestrator<'a> {
    ctx: &'a HarnessContext,
    generator: &'a dyn Generator,
    runner: &'a dyn CommandRunner,
    shell: &'a Shell,
    options: RunOptions,
    state: RunState,
    generated: usize,
    failed: usize,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        ctx: &'a HarnessContext,
        generator: &'a dyn Generator,
        runner: &'a dyn CommandRunner,
        shell: &'a Shell,
    ) -> Self {
        Orchestrator {
            ctx,
            generator,
            runner,
            shell,
            options: RunOptions::default(),
            state: RunState::Idle,
            generated: 0,
            failed: 0,
        }
    }

    pub fn options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) {
        tracing::debug!("run state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Execute the full run.
    pub fn run(mut self) -> RunReport {
        let mut cleanup = CleanupRegistry::new();

        self.transition(RunState::GeneratingComponents);
        let components_ok = self.component_phase(&mut cleanup);

        self.transition(RunState::GeneratingSlices);
        let slices_ok = self.slice_phase(&mut cleanup);

        self.transition(RunState::Verifying);
        let gates = self.verify_phase();
        // A gate that never ran has not passed.
        let gate_ok = |name: &str| {
            let mut runs = gates.iter().filter(|g| g.name == name).peekable();
            runs.peek().is_some() && runs.all(|g| g.passed)
        };
        let lint_ok = gate_ok("lint");
        let typecheck_ok = gate_ok("typecheck");

        self.transition(RunState::CleaningUp);
        let cleanup = if self.options.keep {
            cleanup.run_restores_only(self.shell)
        } else {
            cleanup.run(self.shell)
        };
        if !cleanup.is_clean() {
            self.shell.warn(format!(
                "{} cleanup action(s) failed; the working tree may need manual attention",
                cleanup.failures().count()
            ));
        }

        self.transition(RunState::Done);

        let outcome = RunOutcome {
            components_ok,
            slices_ok,
            lint_ok,
            typecheck_ok,
            fail_on_generation_error: self.ctx.config().fail_on_generation_error(),
        };
        tracing::info!("run finished: {:?}", outcome);

        RunReport {
            outcome,
            generated: self.generated,
            failed: self.failed,
            gates,
            cleanup,
        }
    }

    fn component_phase(&mut self, cleanup: &mut CleanupRegistry) -> bool {
        if !self.options.wants(GeneratorKind::Component) {
            self.shell.status(Status::Skipped, "component generation");
            return true;
        }
        self.generate_kind(GeneratorKind::Component, cleanup)
    }

    /// Back up the root state, then generate slices.
    ///
    /// The restore is queued ahead of the slice directory removals. A failed
    /// backup abandons the slice phase for this run.
    fn slice_phase(&mut self, cleanup: &mut CleanupRegistry) -> bool {
        if !self.options.wants(GeneratorKind::Slice) {
            self.shell.status(Status::Skipped, "slice generation");
            return true;
        }

        let manager = self.ctx.backup_manager();
        let root_state = self.ctx.root_state_path();
        match manager.backup(&root_state) {
            Ok(record) => cleanup.push(CleanupAction::Restore { record, manager }),
            Err(e) => {
                self.report(&e);
                self.shell.status(Status::Skipped, "slice generation");
                return false;
            }
        }

        self.generate_kind(GeneratorKind::Slice, cleanup)
    }

    fn generate_kind(&mut self, kind: GeneratorKind, cleanup: &mut CleanupRegistry) -> bool {
        let specs = kind.variations();
        if let Err(e) = check_unique(&specs) {
            self.report(&e);
            return false;
        }

        let driver = GenerationDriver::new(self.generator, self.shell, self.ctx.base_dir());
        let batch = driver.generate_batch(kind, &specs, self.ctx.config().batch_mode(kind));

        self.generated += batch.succeeded();
        self.failed += batch.outcomes.len() - batch.succeeded();
        cleanup.extend(batch.cleanup.iter().cloned());

        match batch.failure() {
            Some(e) => {
                self.report(&e);
                false
            }
            None => true,
        }
    }

    fn verify_phase(&mut self) -> Vec<GateOutcome> {
        if self.options.skip_verify {
            self.shell.status(Status::Skipped, "verification");
            return Vec::new();
        }

        let config = self.ctx.config();
        let gates = [
            Gate::lint(config.lint_command()),
            Gate::typecheck(config.typecheck_command()),
        ];
        VerificationRunner::new(self.runner, self.shell).check_all(&gates)
    }

    fn report(&self, error: &HarnessError) {
        let diag = error.to_diagnostic();
        self.shell.status(Status::Failed, &diag.message);
        self.shell.block(diag.format_details());
    }
}

/// Warn about configured commands whose program is not on PATH.
pub fn preflight(ctx: &HarnessContext) -> Vec<Diagnostic> {
    let config = ctx.config();
    let commands = [
        ("component generator", config.generator_command(GeneratorKind::Component)),
        ("slice generator", config.generator_command(GeneratorKind::Slice)),
        ("lint gate", config.lint_command()),
        ("typecheck gate", config.typecheck_command()),
    ];

    let mut diagnostics = Vec::new();
    for (role, command) in commands {
        let Some(program) = leading_program(command) else {
            diagnostics.push(Diagnostic::warning(format!("{} command is empty", role)));
            continue;
        };
        let is_path = program.contains('/') || program.contains('\\');
        if !is_path && find_executable(program).is_none() {
            diagnostics.push(
                Diagnostic::warning(format!("`{}` not found on PATH", program))
                    .with_context(format!("{}: {}", role, command)),
            );
        }
    }
    diagnostics
}
