use autodeploy::inspect::{InspectError, RepositoryInspector, ScanConfig};
use autodeploy::AppType;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_flask_fixture() {
    let evidence = RepositoryInspector::new()
        .inspect(&fixture("flask-app"))
        .unwrap();

    assert_eq!(evidence.framework, Some(AppType::Flask));
    assert_eq!(evidence.port, Some(8000));
    assert_eq!(evidence.port_source.as_deref(), Some("app.py"));
    assert!(evidence.has_python_manifest);
    assert!(!evidence.has_node_manifest);

    let deps: Vec<String> = evidence.dependencies.iter().map(|d| d.to_lowercase()).collect();
    assert_eq!(deps, vec!["flask", "gunicorn", "python-dotenv"]);
}

#[test]
fn test_express_fixture() {
    let evidence = RepositoryInspector::new()
        .inspect(&fixture("express-api"))
        .unwrap();

    assert_eq!(evidence.framework, Some(AppType::Express));
    assert_eq!(evidence.port, Some(8080));
    assert!(evidence.has_node_manifest);
    assert!(evidence.dependencies.contains(&"express".to_string()));
    assert!(evidence.dependencies.contains(&"cors".to_string()));
    // devDependencies are not runtime dependencies
    assert!(!evidence.dependencies.contains(&"jest".to_string()));
}

#[test]
fn test_polyglot_prefers_python() {
    let evidence = RepositoryInspector::new()
        .inspect(&fixture("polyglot"))
        .unwrap();

    assert!(evidence.has_python_manifest);
    assert!(evidence.has_node_manifest);
    assert_eq!(evidence.framework, Some(AppType::Django));
    assert!(evidence
        .dependencies
        .iter()
        .any(|d| d.eq_ignore_ascii_case("django")));
    assert!(!evidence.dependencies.contains(&"react".to_string()));
    assert_eq!(evidence.port, None);
}

#[test]
fn test_no_manifest_is_empty_evidence() {
    let evidence = RepositoryInspector::new()
        .inspect(&fixture("no-manifest"))
        .unwrap();

    assert!(evidence.is_empty());
    assert!(!evidence.has_python_manifest);
    assert!(!evidence.has_node_manifest);
    assert_eq!(evidence.files_scanned, 2);
}

#[test]
fn test_malformed_manifest_is_not_fatal() {
    let evidence = RepositoryInspector::new()
        .inspect(&fixture("malformed-package-json"))
        .unwrap();

    assert_eq!(evidence.framework, None);
    assert!(evidence.dependencies.is_empty());
    assert_eq!(evidence.notes.len(), 1);
    assert!(evidence.notes[0].contains("package.json"));
    // the entry point is still read
    assert_eq!(evidence.port, Some(3001));
}

#[test]
fn test_missing_root_is_an_access_error() {
    let err = RepositoryInspector::new()
        .inspect(&fixture("does-not-exist"))
        .unwrap_err();
    assert!(matches!(err, InspectError::PathNotFound(_)));
}

#[test]
fn test_depth_bound_hides_deep_manifests() {
    let dir = TempDir::new().unwrap();
    let deep = dir.path().join("a/b/c");
    fs::create_dir_all(&deep).unwrap();
    fs::write(deep.join("requirements.txt"), "flask\n").unwrap();

    let shallow = RepositoryInspector::with_config(ScanConfig {
        max_depth: 2,
        max_files: 100,
    });
    assert!(shallow.inspect(dir.path()).unwrap().is_empty());

    let deep_enough = RepositoryInspector::with_config(ScanConfig {
        max_depth: 4,
        max_files: 100,
    });
    assert_eq!(
        deep_enough.inspect(dir.path()).unwrap().framework,
        Some(AppType::Flask)
    );
}

#[test]
fn test_dependency_directories_are_skipped() {
    let dir = TempDir::new().unwrap();
    let vendored = dir.path().join("node_modules/express");
    fs::create_dir_all(&vendored).unwrap();
    fs::write(
        vendored.join("package.json"),
        r#"{"name":"express","dependencies":{"react":"18"}}"#,
    )
    .unwrap();

    let evidence = RepositoryInspector::new().inspect(dir.path()).unwrap();
    assert!(evidence.is_empty());
    assert!(!evidence.has_node_manifest);
}
