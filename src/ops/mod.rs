//! High-level operations.
//!
//! This module contains the phases of a gencheck run.

pub mod backup;
pub mod cleanup;
pub mod generate;
pub mod run;
pub mod verify;

pub use backup::{BackupManager, BackupRecord};
pub use cleanup::{CleanupAction, CleanupRegistry, CleanupReport};
pub use generate::{BatchMode, BatchReport, GenerationDriver};
pub use run::{preflight, Orchestrator, RunOptions, RunOutcome, RunReport};
pub use verify::{CommandRunner, Gate, GateOutcome, ShellRunner, VerificationRunner};
