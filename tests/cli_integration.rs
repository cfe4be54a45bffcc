//! CLI integration tests
//!
//! Runs the built binary and checks output, written files and exit codes.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn autodeploy_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_autodeploy"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn run(args: &[&str], cwd: &Path) -> Output {
    Command::new(autodeploy_bin())
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .env_remove("AUTODEPLOY_OUTPUT_ROOT")
        .env_remove("AUTODEPLOY_FETCH_TIMEOUT")
        .env("AUTODEPLOY_LOG_LEVEL", "error")
        .output()
        .expect("Failed to execute autodeploy")
}

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    let output = run(&["--help"], dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("inspect"));
    assert!(stdout.contains("parse"));
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    let output = run(&["--version"], dir.path());

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("autodeploy"));
}

#[test]
fn test_generate_writes_bundle() {
    let dir = TempDir::new().unwrap();
    let output = run(
        &["generate", "Deploy my Flask app on AWS using containers"],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(0), "{:?}", output);
    let bundle = dir.path().join("deployment_flask-app");
    for file in ["Dockerfile", "main.tf", "deploy.sh", "docker-compose.yml", "README.md"] {
        assert!(bundle.join(file).is_file(), "missing {file}");
    }
    let dockerfile = fs::read_to_string(bundle.join("Dockerfile")).unwrap();
    assert!(dockerfile.contains("EXPOSE 5000"));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Deployment Bundle"));
    assert!(stdout.contains("Written to:"));
}

#[test]
fn test_generate_json_with_local_repository() {
    let dir = TempDir::new().unwrap();
    let repo = fixture("express-api");
    let output = run(
        &[
            "generate",
            "Deploy Node.js API",
            "--repo",
            repo.to_str().unwrap(),
            "--format",
            "json",
            "--output-dir",
            dir.path().to_str().unwrap(),
        ],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(0), "{:?}", output);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "complete");
    assert_eq!(value["config"]["app_type"], "express");
    assert_eq!(value["config"]["port"], 8080);
    assert_eq!(value["evidence"]["port"], 8080);
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = run(&["generate", "react on gcp", "--dry-run"], dir.path());

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Dry run"));
}

#[test]
fn test_unusable_repository_is_degraded_success() {
    let dir = TempDir::new().unwrap();
    let output = run(
        &[
            "generate",
            "django on azure",
            "--repo",
            "https://gitlab.com/acme/site",
            "--format",
            "json",
            "--dry-run",
        ],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "degraded");
    assert_eq!(value["files"].as_array().unwrap().len(), 5);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Warning"));
}

#[test]
fn test_blank_description_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(&["generate", "   "], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("empty"));
}

#[test]
fn test_unwritable_output_dir_exits_with_two() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "file").unwrap();

    let output = run(
        &[
            "generate",
            "flask on aws",
            "--output-dir",
            blocker.to_str().unwrap(),
        ],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_inspect_command() {
    let dir = TempDir::new().unwrap();
    let output = run(
        &[
            "inspect",
            fixture("flask-app").to_str().unwrap(),
            "--format",
            "yaml",
        ],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("framework: flask"));
    assert!(stdout.contains("port: 8000"));
}

#[test]
fn test_inspect_missing_path_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(&["inspect", "/definitely/not/here"], dir.path());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_parse_command() {
    let dir = TempDir::new().unwrap();
    let output = run(
        &["parse", "Deploy my express api to gcp serverless", "-f", "json"],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["app_type"], "express");
    assert_eq!(value["cloud_provider"], "gcp");
    assert_eq!(value["deployment_mode"], "serverless");
    assert_eq!(value["port"], 3000);
}

#[test]
fn test_invalid_environment_fails() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(autodeploy_bin())
        .args(["parse", "flask"])
        .current_dir(dir.path())
        .env("AUTODEPLOY_FETCH_TIMEOUT", "forever")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("AUTODEPLOY_FETCH_TIMEOUT"));
}
