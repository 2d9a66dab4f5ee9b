//! Deferred reversal of generated artifacts.
//!
//! Generation phases queue [`CleanupAction`]s instead of undoing their work
//! immediately, so the verification gates see every generated file at once.
//! The registry then runs the actions exactly once, in enqueue order. Every
//! action is attempted; failures are collected into a [`CleanupReport`].

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::ops::backup::{BackupManager, BackupRecord};
use crate::util::fs::remove_dir_all_if_exists;
use crate::util::shell::{Shell, Status};

/// One deferred reversal.
#[derive(Debug, Clone)]
pub enum CleanupAction {
    /// Remove a generated directory. A missing directory counts as clean.
    RemoveDir { label: String, path: PathBuf },

    /// Put a backed-up file back and delete the backup.
    Restore {
        record: BackupRecord,
        manager: BackupManager,
    },
}

impl CleanupAction {
    /// Human-readable description used in messages and reports.
    pub fn describe(&self) -> String {
        match self {
            CleanupAction::RemoveDir { label, .. } => format!("'{}'", label),
            CleanupAction::Restore { record, .. } => record.original.display().to_string(),
        }
    }

    fn status(&self) -> Status {
        match self {
            CleanupAction::RemoveDir { .. } => Status::Cleaned,
            CleanupAction::Restore { .. } => Status::Restored,
        }
    }

    /// Perform the action.
    pub fn run(&self) -> Result<()> {
        match self {
            CleanupAction::RemoveDir { path, .. } => remove_dir_all_if_exists(path),
            CleanupAction::Restore { record, manager } => {
                manager.restore(&record.original)?;
                Ok(())
            }
        }
    }
}

/// Outcome of one cleanup action.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupEntry {
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a cleanup pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupReport {
    pub entries: Vec<CleanupEntry>,
}

impl CleanupReport {
    /// True when every action succeeded.
    pub fn is_clean(&self) -> bool {
        self.entries.iter().all(|e| e.error.is_none())
    }

    /// Entries whose action failed.
    pub fn failures(&self) -> impl Iterator<Item = &CleanupEntry> {
        self.entries.iter().filter(|e| e.error.is_some())
    }
}

/// Ordered queue of cleanup actions.
#[derive(Debug, Default)]
pub struct CleanupRegistry {
    actions: Vec<CleanupAction>,
}

impl CleanupRegistry {
    pub fn new() -> Self {
        CleanupRegistry::default()
    }

    /// Queue one action.
    pub fn push(&mut self, action: CleanupAction) {
        self.actions.push(action);
    }

    /// Queue several actions, keeping their order.
    pub fn extend(&mut self, actions: impl IntoIterator<Item = CleanupAction>) {
        self.actions.extend(actions);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[CleanupAction] {
        &self.actions
    }

    /// Run every queued action in order, consuming the registry.
    pub fn run(self, shell: &Shell) -> CleanupReport {
        let mut report = CleanupReport::default();

        for action in self.actions {
            let description = action.describe();
            let error = match action.run() {
                Ok(()) => {
                    shell.status(action.status(), &description);
                    None
                }
                Err(e) => {
                    tracing::warn!("cleanup of {} failed: {:#}", description, e);
                    shell.error(format!("failed to clean {}: {:#}", description, e));
                    Some(format!("{:#}", e))
                }
            };
            report.entries.push(CleanupEntry {
                action: description,
                error,
            });
        }

        report
    }

    /// Drop directory removals, running only file restores.
    ///
    /// Used when generated output is kept for inspection: the shared state
    /// file must still go back to its pre-run contents.
    pub fn run_restores_only(self, shell: &Shell) -> CleanupReport {
        let (restores, kept): (Vec<_>, Vec<_>) = self
            .actions
            .into_iter()
            .partition(|a| matches!(a, CleanupAction::Restore { .. }));

        for action in &kept {
            if let CleanupAction::RemoveDir { path, .. } = action {
                shell.status(Status::Kept, path.display());
            }
        }

        CleanupRegistry { actions: restores }.run(shell)
    }
}
