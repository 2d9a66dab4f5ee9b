//! Project context for gencheck operations.
//!
//! Every path a run touches is resolved here against an explicit project
//! root. Nothing changes the process working directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::ops::backup::BackupManager;
use crate::util::config::{global_config_path, load_config, Config, PROJECT_CONFIG_NAME};
use crate::util::fs::find_upwards;

/// Project root, resolved configuration and derived paths.
#[derive(Debug, Clone)]
pub struct HarnessContext {
    /// Project root (directory holding gencheck.toml, or the start directory)
    root: PathBuf,

    /// Project config file, when one was found
    config_path: Option<PathBuf>,

    /// Merged configuration
    config: Config,
}

impl HarnessContext {
    /// Discover the project from the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::discover(&cwd))
    }

    /// Discover the project starting at `start`, merging global config.
    pub fn discover(start: &Path) -> Self {
        let config_path = find_upwards(start, PROJECT_CONFIG_NAME);
        let root = config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(start)
            .to_path_buf();

        let global = global_config_path();
        let config = load_config(global.as_deref(), config_path.as_deref());

        tracing::debug!(
            "project root {} (config: {})",
            root.display(),
            config_path
                .as_deref()
                .map_or_else(|| "none".to_string(), |p| p.display().to_string())
        );

        HarnessContext {
            root,
            config_path,
            config,
        }
    }

    /// Build a context from an explicit root and config.
    pub fn with_config(root: impl Into<PathBuf>, config: Config) -> Self {
        HarnessContext {
            root: root.into(),
            config_path: None,
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Where `config --init` writes.
    pub fn project_config_path(&self) -> PathBuf {
        self.config_path
            .clone()
            .unwrap_or_else(|| self.root.join(PROJECT_CONFIG_NAME))
    }

    /// Resolve a configured path against the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Working directory for generator commands.
    pub fn generators_dir(&self) -> PathBuf {
        self.resolve(self.config.generators_dir())
    }

    /// Directory generated code lands in.
    pub fn base_dir(&self) -> PathBuf {
        self.resolve(self.config.base_dir())
    }

    /// The shared state file protected during slice generation.
    pub fn root_state_path(&self) -> PathBuf {
        self.resolve(self.config.root_state())
    }

    pub fn backup_manager(&self) -> BackupManager {
        BackupManager::new(self.config.backup_extension())
    }
}
