//! End-to-end tests for the `archtag` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const REGISTRY: &str = r#"
architectures:
  app.service:
    description: Application services
    constraints:
      - rule: forbid_import
        value: axios
        why: Use the shared HTTP client
        alternative: src/lib/http
    hints: [Keep services thin]
"#;

const MANIFEST: &str = r#"{
  "files": {
    "src/clean.ts": { "arch": "app.service" },
    "src/dirty.ts": {
      "arch": "app.service",
      "model": { "imports": [{ "module": "axios", "line": 1 }] }
    }
  }
}"#;

fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("src")).unwrap();
    fs::write(tmp.path().join("archtag.yaml"), REGISTRY).unwrap();
    fs::write(tmp.path().join("models.json"), MANIFEST).unwrap();
    fs::write(tmp.path().join("src/clean.ts"), "export const a = 1;\n").unwrap();
    fs::write(tmp.path().join("src/dirty.ts"), "import axios from 'axios';\n").unwrap();
    tmp
}

fn archtag(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_archtag"))
        .current_dir(dir)
        .env("ARCHTAG_CONFIG_DIR", dir.join("no-global"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn check_fails_on_violation() {
    let tmp = project();
    let out = archtag(tmp.path(), &["check", "--models", "models.json", "--format", "compact"]);

    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("src/dirty.ts:1:1: error [forbid_import:axios]"));
    assert!(!stdout.contains("src/clean.ts"));
}

#[test]
fn check_passes_selected_clean_file() {
    let tmp = project();
    let out = archtag(
        tmp.path(),
        &["check", "--models", "models.json", "src/clean.ts"],
    );
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("1 passed"));
}

#[test]
fn check_json_reports_counts() {
    let tmp = project();
    let out = archtag(tmp.path(), &["check", "--models", "models.json", "--format", "json"]);
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["passed"], 1);
    assert_eq!(report["failed"], 1);
}

#[test]
fn resolve_prints_rule_set() {
    let tmp = project();
    let out = archtag(tmp.path(), &["resolve", "app.service"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("forbid_import:axios"));
    assert!(stdout.contains("Keep services thin"));
}

#[test]
fn resolve_unknown_architecture_fails() {
    let tmp = project();
    let out = archtag(tmp.path(), &["resolve", "ghost"]);
    assert!(!out.status.success());
}

#[test]
fn list_rules_names_catalog() {
    let tmp = project();
    let out = archtag(tmp.path(), &["list-rules"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("forbid_import"));
    assert!(stdout.contains("max_public_methods"));
}
