//! Configuration file support for gencheck.
//!
//! gencheck supports two configuration file locations:
//! - Global: `~/.gencheck/config.toml` - User-wide defaults
//! - Project: `gencheck.toml` - found in the working directory or an ancestor
//!
//! Project config takes precedence over global config. Every key is optional;
//! unset keys fall back to the defaults below, which match a React
//! boilerplate with plop generators under `internals/generators`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::variation::GeneratorKind;
use crate::ops::backup::BACKUP_EXTENSION;
use crate::ops::generate::BatchMode;

/// Project config file name.
pub const PROJECT_CONFIG_NAME: &str = "gencheck.toml";

pub const DEFAULT_GENERATORS_DIR: &str = "internals/generators";
pub const DEFAULT_BASE_DIR: &str = "src/app";
pub const DEFAULT_ROOT_STATE: &str = "src/types/RootState.ts";
pub const DEFAULT_COMPONENT_GENERATOR: &str = "node plop-runner.js component";
pub const DEFAULT_SLICE_GENERATOR: &str = "node plop-runner.js slice";
pub const DEFAULT_LINT: &str = "yarn run lint";
pub const DEFAULT_TYPECHECK: &str = "yarn run checkTs";

/// gencheck configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project layout
    pub paths: PathsConfig,

    /// Generator commands
    pub generator: GeneratorConfig,

    /// Verification gates
    pub verify: VerifyConfig,

    /// Run policy
    pub run: RunConfig,
}

/// Project layout, relative to the project root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PathsConfig {
    /// Working directory for generator commands
    pub generators: Option<PathBuf>,

    /// Directory generated code lands in
    pub base: Option<PathBuf>,

    /// Shared state file the slice generator rewrites
    pub root_state: Option<PathBuf>,

    /// Marker extension for backup copies
    pub backup_extension: Option<String>,
}

/// Generator command lines and scheduling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GeneratorConfig {
    pub component: Option<String>,
    pub slice: Option<String>,
    pub component_mode: Option<BatchMode>,
    pub slice_mode: Option<BatchMode>,
}

/// Gate command lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct VerifyConfig {
    pub lint: Option<String>,
    pub typecheck: Option<String>,
}

/// Exit-status policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RunConfig {
    /// Whether a failed generation alone makes the run fail
    pub fail_on_generation_error: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).with_context(|| "failed to serialize config")?;
        crate::util::fs::write_string(path, &contents)
    }

    /// A config with every key set to its default, for `config --init`.
    pub fn with_defaults() -> Self {
        Config {
            paths: PathsConfig {
                generators: Some(PathBuf::from(DEFAULT_GENERATORS_DIR)),
                base: Some(PathBuf::from(DEFAULT_BASE_DIR)),
                root_state: Some(PathBuf::from(DEFAULT_ROOT_STATE)),
                backup_extension: Some(BACKUP_EXTENSION.to_string()),
            },
            generator: GeneratorConfig {
                component: Some(DEFAULT_COMPONENT_GENERATOR.to_string()),
                slice: Some(DEFAULT_SLICE_GENERATOR.to_string()),
                component_mode: Some(BatchMode::Concurrent),
                slice_mode: Some(BatchMode::Sequential),
            },
            verify: VerifyConfig {
                lint: Some(DEFAULT_LINT.to_string()),
                typecheck: Some(DEFAULT_TYPECHECK.to_string()),
            },
            run: RunConfig {
                fail_on_generation_error: Some(true),
            },
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.paths.generators, other.paths.generators);
        take(&mut self.paths.base, other.paths.base);
        take(&mut self.paths.root_state, other.paths.root_state);
        take(&mut self.paths.backup_extension, other.paths.backup_extension);

        take(&mut self.generator.component, other.generator.component);
        take(&mut self.generator.slice, other.generator.slice);
        take(&mut self.generator.component_mode, other.generator.component_mode);
        take(&mut self.generator.slice_mode, other.generator.slice_mode);

        take(&mut self.verify.lint, other.verify.lint);
        take(&mut self.verify.typecheck, other.verify.typecheck);

        take(
            &mut self.run.fail_on_generation_error,
            other.run.fail_on_generation_error,
        );
    }

    pub fn generators_dir(&self) -> &Path {
        self.paths
            .generators
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_GENERATORS_DIR))
    }

    pub fn base_dir(&self) -> &Path {
        self.paths.base.as_deref().unwrap_or(Path::new(DEFAULT_BASE_DIR))
    }

    pub fn root_state(&self) -> &Path {
        self.paths
            .root_state
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_ROOT_STATE))
    }

    pub fn backup_extension(&self) -> &str {
        self.paths
            .backup_extension
            .as_deref()
            .unwrap_or(BACKUP_EXTENSION)
    }

    /// Generator command line for a kind.
    pub fn generator_command(&self, kind: GeneratorKind) -> &str {
        match kind {
            GeneratorKind::Component => self
                .generator
                .component
                .as_deref()
                .unwrap_or(DEFAULT_COMPONENT_GENERATOR),
            GeneratorKind::Slice => self
                .generator
                .slice
                .as_deref()
                .unwrap_or(DEFAULT_SLICE_GENERATOR),
        }
    }

    /// Batch scheduling for a kind.
    ///
    /// Slices default to sequential: each slice run rewrites the root state.
    pub fn batch_mode(&self, kind: GeneratorKind) -> BatchMode {
        match kind {
            GeneratorKind::Component => self
                .generator
                .component_mode
                .unwrap_or(BatchMode::Concurrent),
            GeneratorKind::Slice => self.generator.slice_mode.unwrap_or(BatchMode::Sequential),
        }
    }

    pub fn lint_command(&self) -> &str {
        self.verify.lint.as_deref().unwrap_or(DEFAULT_LINT)
    }

    pub fn typecheck_command(&self) -> &str {
        self.verify.typecheck.as_deref().unwrap_or(DEFAULT_TYPECHECK)
    }

    pub fn fail_on_generation_error(&self) -> bool {
        self.run.fail_on_generation_error.unwrap_or(true)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (gencheck.toml)
/// 2. Global config (~/.gencheck/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: Option<&Path>) -> Config {
    let mut config = Config::default();

    for path in [global_path, project_path].into_iter().flatten() {
        if path.exists() {
            config.merge(Config::load_or_default(path));
        }
    }

    config
}

/// Get the global gencheck config directory (~/.gencheck).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".gencheck"))
}

/// Get the global config path (~/.gencheck/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}
