//! Dependency manifest parsers.
//!
//! `requirements.txt` is read line by line; `package.json` is parsed as JSON
//! and only the keys of its `dependencies` object are kept. A parse failure
//! is reported as [`ManifestParseError`] and the caller treats the manifest
//! as carrying no evidence.

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestParseError {
    #[error("{path}: invalid JSON: {source}")]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: manifest is not valid UTF-8")]
    NotUtf8 { path: String },

    #[error("{path}: expected a JSON object at the top level")]
    NotAnObject { path: String },

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn read_manifest(path: &Path) -> Result<String, ManifestParseError> {
    let display = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|source| ManifestParseError::Io {
        path: display.clone(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| ManifestParseError::NotUtf8 { path: display })
}

/// Requirement names from a pip requirements file.
///
/// Comments, blank lines and option lines (`-r`, `--index-url`, `-e`) are
/// skipped; version specifiers, extras and environment markers are stripped.
pub fn parse_requirements(content: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for line in content.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() || line.starts_with('-') {
            continue;
        }

        let end = line
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'))
            .unwrap_or(line.len());
        let name = &line[..end];
        if name.is_empty() {
            continue;
        }
        if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            names.push(name.to_string());
        }
    }

    names
}

pub fn read_requirements(path: &Path) -> Result<Vec<String>, ManifestParseError> {
    read_manifest(path).map(|content| parse_requirements(&content))
}

/// Keys of the `dependencies` object of a package.json document, in
/// document order. A document without `dependencies` yields an empty list.
pub fn parse_package_json(content: &str, path: &str) -> Result<Vec<String>, ManifestParseError> {
    let parsed: serde_json::Value =
        serde_json::from_str(content).map_err(|source| ManifestParseError::InvalidJson {
            path: path.to_string(),
            source,
        })?;

    let root = parsed
        .as_object()
        .ok_or_else(|| ManifestParseError::NotAnObject {
            path: path.to_string(),
        })?;

    Ok(root
        .get("dependencies")
        .and_then(|v| v.as_object())
        .map(|deps| deps.keys().cloned().collect())
        .unwrap_or_default())
}

pub fn read_package_json(path: &Path) -> Result<Vec<String>, ManifestParseError> {
    let content = read_manifest(path)?;
    parse_package_json(&content, &path.display().to_string())
}
