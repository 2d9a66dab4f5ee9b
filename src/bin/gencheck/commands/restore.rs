//! `gencheck restore` command
//!
//! Recovers the root state file after an interrupted run left its backup
//! behind.

use anyhow::{bail, Result};

use crate::cli::RestoreArgs;
use gencheck::util::shell::Status;
use gencheck::util::{HarnessContext, Shell};

pub fn execute(args: RestoreArgs, shell: &Shell) -> Result<()> {
    let ctx = HarnessContext::new()?;
    let manager = ctx.backup_manager();
    let root_state = ctx.root_state_path();

    if !manager.has_backup(&root_state) {
        if args.if_exists {
            shell.note(format!("no backup of {}", root_state.display()));
            return Ok(());
        }
        bail!(
            "no backup found at `{}`",
            manager.backup_path(&root_state).display()
        );
    }

    manager.restore(&root_state)?;
    shell.status(Status::Restored, root_state.display());

    Ok(())
}
