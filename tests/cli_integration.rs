//! CLI integration tests for gencheck.
//!
//! These tests drive the binary against a throwaway front-end project whose
//! generators and gates are small shell snippets.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const ROOT_STATE: &str = "export interface RootState {\n  // [INSERT NEW REDUCER KEY ABOVE]\n}\n";

/// Get the gencheck binary command, isolated from the user's global config.
fn gencheck(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gencheck").unwrap();
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home);
    cmd
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Lay out a minimal project with the given gencheck.toml.
fn project(tmp: &TempDir, config: &str) -> PathBuf {
    let root = tmp.path().join("webapp");
    fs::create_dir_all(root.join("internals/generators")).unwrap();
    fs::create_dir_all(root.join("src/types")).unwrap();
    fs::create_dir_all(root.join("src/app/pages/HomePage")).unwrap();
    fs::write(root.join("src/types/RootState.ts"), ROOT_STATE).unwrap();
    fs::write(root.join("gencheck.toml"), config).unwrap();
    root
}

#[cfg(unix)]
fn config(component: &str, slice: &str, lint: &str) -> String {
    format!(
        r#"[generator]
component = '''{component}'''
slice = '''{slice}'''

[verify]
lint = "{lint}"
typecheck = "true"
"#
    )
}

#[cfg(unix)]
const SUCCEED: &str = r#"cat >/dev/null; echo '{"changes":[]}'"#;

/// Writes a file into the output directory named by the request, and
/// rewrites the root state the way a slice generator does.
#[cfg(unix)]
const SLICE_WRITER: &str = r#"cat >/dev/null; mkdir -p ../../src/app/slice && echo x > ../../src/app/slice/index.ts; echo 'key: State;' >> ../../src/types/RootState.ts; echo '{"changes":[{"type":"modify","path":"src/types/RootState.ts"}]}'"#;

// ============================================================================
// gencheck variations
// ============================================================================

#[test]
fn test_variations_lists_every_component() {
    let tmp = temp_dir();

    let output = gencheck(tmp.path())
        .args(["variations", "--kind", "component"])
        .current_dir(tmp.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 35);
    assert!(stdout.contains("GeneratorTestingComponent31"));
    assert!(stdout.contains("/pages/HomePage/Features"));
}

#[test]
fn test_variations_json() {
    let tmp = temp_dir();

    let output = gencheck(tmp.path())
        .args(["variations", "--kind", "slices", "--message-format", "json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["kind"], "slice");
    assert_eq!(entries[0]["input"]["sliceName"], "generatorTestingSlice1");
}

#[test]
fn test_variations_rejects_unknown_kind() {
    let tmp = temp_dir();

    gencheck(tmp.path())
        .args(["variations", "--kind", "container"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid generator kind"));
}

// ============================================================================
// gencheck run
// ============================================================================

#[cfg(unix)]
#[test]
fn test_run_passes_and_restores_root_state() {
    let tmp = temp_dir();
    let root = project(&tmp, &config(SUCCEED, SLICE_WRITER, "true"));

    gencheck(tmp.path())
        .args(["run", "--no-preflight"])
        .current_dir(&root)
        .assert()
        .success()
        .stderr(predicate::str::contains("Linting test passed"));

    assert_eq!(
        fs::read_to_string(root.join("src/types/RootState.ts")).unwrap(),
        ROOT_STATE
    );
    assert!(!root.join("src/types/RootState.ts.rbgen").exists());
    assert!(!root.join("src/app/slice").exists());
    assert!(root.join("src/app/pages/HomePage").exists());
}

#[cfg(unix)]
#[test]
fn test_run_fails_when_lint_fails() {
    let tmp = temp_dir();
    let root = project(&tmp, &config(SUCCEED, SLICE_WRITER, "false"));

    gencheck(tmp.path())
        .args(["run", "--no-preflight"])
        .current_dir(&root)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Linting failed"))
        .stderr(predicate::str::contains("Typescript test passed"));

    assert_eq!(
        fs::read_to_string(root.join("src/types/RootState.ts")).unwrap(),
        ROOT_STATE
    );
}

#[cfg(unix)]
#[test]
fn test_run_reports_generation_failure() {
    let tmp = temp_dir();
    let failing = r#"cat >/dev/null; echo '{"failures":[{"type":"add","path":"x","error":"template missing"}]}'"#;
    let root = project(&tmp, &config(failing, SUCCEED, "true"));

    gencheck(tmp.path())
        .args(["run", "--no-preflight", "--only", "component"])
        .current_dir(&root)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "35 of the component variations failed to generate",
        ))
        .stderr(predicate::str::contains("template missing"));
}

#[cfg(unix)]
#[test]
fn test_run_generation_failure_can_be_tolerated() {
    let tmp = temp_dir();
    let failing = r#"cat >/dev/null; exit 3"#;
    let mut config = config(SUCCEED, failing, "true");
    config.push_str("\n[run]\nfail-on-generation-error = false\n");
    let root = project(&tmp, &config);

    gencheck(tmp.path())
        .args(["run", "--no-preflight", "--only", "slice"])
        .current_dir(&root)
        .assert()
        .success()
        .stderr(predicate::str::contains("failed to generate"));

    assert!(!root.join("src/types/RootState.ts.rbgen").exists());
}

#[cfg(unix)]
#[test]
fn test_run_refuses_stale_backup() {
    let tmp = temp_dir();
    let root = project(&tmp, &config(SUCCEED, SLICE_WRITER, "true"));
    fs::write(root.join("src/types/RootState.ts.rbgen"), "stale").unwrap();

    gencheck(tmp.path())
        .args(["run", "--no-preflight", "--skip-verify"])
        .current_dir(&root)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));

    // The stale backup is left for `gencheck restore`.
    assert_eq!(
        fs::read_to_string(root.join("src/types/RootState.ts.rbgen")).unwrap(),
        "stale"
    );
    assert_eq!(
        fs::read_to_string(root.join("src/types/RootState.ts")).unwrap(),
        ROOT_STATE
    );
}

#[cfg(unix)]
#[test]
fn test_run_json_report() {
    let tmp = temp_dir();
    let root = project(&tmp, &config(SUCCEED, SUCCEED, "true"));

    let output = gencheck(tmp.path())
        .args(["run", "--no-preflight", "--message-format", "json"])
        .current_dir(&root)
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["reason"], "run-finished");
    assert_eq!(report["generated"], 38);
    assert_eq!(report["outcome"]["lint_ok"], true);
}

#[test]
fn test_run_without_generators_dir_fails() {
    let tmp = temp_dir();
    let root = tmp.path().join("bare");
    fs::create_dir_all(&root).unwrap();

    gencheck(tmp.path())
        .args(["run", "--no-preflight"])
        .current_dir(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("generator directory"));
}

// ============================================================================
// gencheck restore
// ============================================================================

#[test]
fn test_restore_recovers_backup() {
    let tmp = temp_dir();
    let root = project(&tmp, "");
    fs::write(root.join("src/types/RootState.ts"), "half-written").unwrap();
    fs::write(root.join("src/types/RootState.ts.rbgen"), ROOT_STATE).unwrap();

    gencheck(tmp.path())
        .arg("restore")
        .current_dir(&root)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(root.join("src/types/RootState.ts")).unwrap(),
        ROOT_STATE
    );
    assert!(!root.join("src/types/RootState.ts.rbgen").exists());
}

#[test]
fn test_restore_without_backup() {
    let tmp = temp_dir();
    let root = project(&tmp, "");

    gencheck(tmp.path())
        .arg("restore")
        .current_dir(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no backup found"));

    gencheck(tmp.path())
        .args(["restore", "--if-exists"])
        .current_dir(&root)
        .assert()
        .success();
}

// ============================================================================
// gencheck config
// ============================================================================

#[test]
fn test_config_init_writes_defaults() {
    let tmp = temp_dir();
    let root = tmp.path().join("fresh");
    fs::create_dir_all(&root).unwrap();

    gencheck(tmp.path())
        .args(["config", "--init"])
        .current_dir(&root)
        .assert()
        .success();

    let written = fs::read_to_string(root.join("gencheck.toml")).unwrap();
    assert!(written.contains("[paths]"));
    assert!(written.contains("root-state = \"src/types/RootState.ts\""));
    assert!(written.contains("lint = \"yarn run lint\""));

    gencheck(tmp.path())
        .args(["config", "--init"])
        .current_dir(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_shows_resolved_values() {
    let tmp = temp_dir();
    let root = project(&tmp, "[verify]\nlint = \"eslint src\"\n");

    gencheck(tmp.path())
        .arg("config")
        .current_dir(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("verify.lint = eslint src"))
        .stdout(predicate::str::contains("verify.typecheck = yarn run checkTs"))
        .stdout(predicate::str::contains("generator.slice-mode = sequential"));
}

// ============================================================================
// gencheck completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = temp_dir();

    gencheck(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gencheck"));
}
