//! Test fixtures for common test scenarios.
//!
//! This module provides a pre-built front-end project layout: a generator
//! directory, an application source tree and the shared root-state file the
//! slice generator rewrites.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default contents of the shared root-state file.
pub const ROOT_STATE: &str = r#"// [IMPORT NEW CONTAINERSTATE ABOVE] < Needed for generating containers seamlessly

/*
  Because the redux-injectors injects your reducers asynchronously somewhere in your code
  You have to declare them here manually
*/
export interface RootState {
  // [INSERT NEW REDUCER KEY ABOVE] < Needed for generating containers seamlessly
}
"#;

/// Fixture for a front-end project that uses gencheck.
#[derive(Debug, Clone)]
pub struct FrontendFixture {
    /// Project directory name.
    pub name: String,
    /// gencheck.toml content, if any.
    pub config: Option<String>,
    /// Files (path relative to project root -> content).
    pub files: BTreeMap<PathBuf, String>,
}

impl Default for FrontendFixture {
    fn default() -> Self {
        FrontendFixture::new()
    }
}

impl FrontendFixture {
    /// Create the standard layout without a config file.
    pub fn new() -> Self {
        let mut files = BTreeMap::new();
        files.insert(PathBuf::from("src/types/RootState.ts"), ROOT_STATE.to_string());
        files.insert(
            PathBuf::from("src/app/pages/HomePage/index.tsx"),
            "export function HomePage() {\n  return null;\n}\n".to_string(),
        );
        files.insert(
            PathBuf::from("src/app/pages/HomePage/Features/index.tsx"),
            "export function Features() {\n  return null;\n}\n".to_string(),
        );
        files.insert(
            PathBuf::from("internals/generators/plopfile.ts"),
            "export default function plop() {}\n".to_string(),
        );
        files.insert(
            PathBuf::from("package.json"),
            r#"{ "name": "fixture", "private": true }"#.to_string(),
        );

        FrontendFixture {
            name: "webapp".to_string(),
            config: None,
            files,
        }
    }

    /// Set the gencheck.toml content.
    pub fn with_config(mut self, config: impl Into<String>) -> Self {
        self.config = Some(config.into());
        self
    }

    /// Add or replace a file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Write this fixture under `base_path`; returns the project root.
    pub fn write_to(&self, base_path: &Path) -> std::io::Result<PathBuf> {
        let project_path = base_path.join(&self.name);
        std::fs::create_dir_all(&project_path)?;

        if let Some(ref config) = self.config {
            std::fs::write(project_path.join("gencheck.toml"), config)?;
        }

        for (rel_path, content) in &self.files {
            let full_path = project_path.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
        }

        Ok(project_path)
    }
}

/// Generator command lines for tests that spawn real processes.
#[cfg(unix)]
pub mod commands {
    /// A generator that consumes its input and reports success.
    pub const SUCCEED: &str = r#"cat >/dev/null; echo '{"changes":[]}'"#;

    /// A generator that reports one failure.
    pub const FAIL: &str = r#"cat >/dev/null; echo '{"failures":[{"message":"x"}]}'"#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_layout() {
        let tmp = tempfile::TempDir::new().unwrap();
        let root = FrontendFixture::new()
            .with_config("[verify]\nlint = \"true\"\n")
            .write_to(tmp.path())
            .unwrap();

        assert!(root.join("gencheck.toml").exists());
        assert!(root.join("internals/generators").is_dir());
        assert_eq!(
            std::fs::read_to_string(root.join("src/types/RootState.ts")).unwrap(),
            ROOT_STATE
        );
    }
}
