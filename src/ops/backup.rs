//! Scoped file backup and restore.
//!
//! A backup is a byte-for-byte sibling copy named by appending a marker
//! extension (`RootState.ts` -> `RootState.ts.rbgen`). At most one backup may
//! exist per file; a leftover backup from an interrupted run blocks new ones
//! until it is restored.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::util::errors::HarnessError;

/// Default backup marker extension.
pub const BACKUP_EXTENSION: &str = "rbgen";

/// A live backup: the original file and its saved copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    pub original: PathBuf,
    pub backup: PathBuf,
}

/// Creates and restores file backups.
#[derive(Debug, Clone)]
pub struct BackupManager {
    extension: String,
}

impl Default for BackupManager {
    fn default() -> Self {
        BackupManager::new(BACKUP_EXTENSION)
    }
}

impl BackupManager {
    /// Create a manager using the given marker extension (without the dot).
    pub fn new(extension: impl Into<String>) -> Self {
        BackupManager {
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Path of the backup copy for `path`.
    pub fn backup_path(&self, path: &Path) -> PathBuf {
        let mut name = OsString::from(path.as_os_str());
        name.push(".");
        name.push(&self.extension);
        PathBuf::from(name)
    }

    /// Whether a backup currently exists for `path`.
    pub fn has_backup(&self, path: &Path) -> bool {
        self.backup_path(path).is_file()
    }

    /// Copy `path` to its backup location.
    ///
    /// Fails if `path` does not exist or a backup is already present.
    pub fn backup(&self, path: &Path) -> Result<BackupRecord, HarnessError> {
        let backup = self.backup_path(path);
        let failure = |reason: String| HarnessError::BackupFailure {
            path: path.to_path_buf(),
            backup: backup.clone(),
            reason,
        };

        let mut source = fs::File::open(path).map_err(|e| failure(e.to_string()))?;

        let mut target = match OpenOptions::new().write(true).create_new(true).open(&backup) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(failure(format!(
                    "backup `{}` already exists",
                    backup.display()
                )));
            }
            Err(e) => return Err(failure(e.to_string())),
        };

        let copied = io::copy(&mut source, &mut target).and_then(|_| {
            let permissions = source.metadata()?.permissions();
            target.set_permissions(permissions)
        });
        if let Err(e) = copied {
            drop(target);
            let _ = fs::remove_file(&backup);
            return Err(failure(e.to_string()));
        }

        tracing::debug!("backed up {} to {}", path.display(), backup.display());

        Ok(BackupRecord {
            original: path.to_path_buf(),
            backup,
        })
    }

    /// Copy the backup of `path` back over it and delete the backup.
    pub fn restore(&self, path: &Path) -> Result<(), HarnessError> {
        let backup = self.backup_path(path);
        let failure = |reason: String| HarnessError::RestoreFailure {
            path: path.to_path_buf(),
            reason,
        };

        if !backup.is_file() {
            return Err(failure(format!("no backup at `{}`", backup.display())));
        }

        fs::copy(&backup, path).map_err(|e| failure(e.to_string()))?;
        fs::remove_file(&backup).map_err(|e| failure(e.to_string()))?;

        tracing::debug!("restored {} from {}", path.display(), backup.display());
        Ok(())
    }
}
