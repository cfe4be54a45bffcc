//! Repository inspection
//!
//! Walks an already unpacked repository and turns what it finds into an
//! [`Evidence`] record. Only two manifests are recognized, `requirements.txt`
//! and `package.json`, plus a handful of entry-point files that are scanned
//! for a listening port.
//!
//! When a repository carries both ecosystems, Python signals take priority:
//! a framework detected from `requirements.txt` wins over one detected from
//! `package.json`. Once a framework is decided, the port is only looked for
//! in that ecosystem's entry points, so a bundled frontend server never sets
//! the backend's port. Both ecosystems are searched only when no manifest
//! decided a framework. This is a fixed policy and does not depend on walk
//! order.
//!
//! A repository without any recognizable manifest is not an error; it yields
//! an empty `Evidence`. The only failures are a root that is missing, not a
//! directory, or unreadable.

pub mod evidence;
pub mod manifest;
pub mod port;
pub mod scanner;

pub use evidence::Evidence;
pub use manifest::ManifestParseError;
pub use scanner::{RepositoryScanner, ScanConfig, ScanResult};

use crate::stack::{AppType, Ecosystem, FrameworkRegistry};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("Repository path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Repository path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Repository path is not readable: {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Signals read from one manifest.
struct ManifestSignal {
    framework: Option<AppType>,
    dependencies: Vec<String>,
}

pub struct RepositoryInspector {
    frameworks: FrameworkRegistry,
    config: ScanConfig,
}

impl RepositoryInspector {
    pub fn new() -> Self {
        Self::with_config(ScanConfig::default())
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Self {
            frameworks: FrameworkRegistry::with_defaults(),
            config,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn inspect(&self, root: &Path) -> Result<Evidence, InspectError> {
        let root = Self::check_root(root)?;
        info!(root = %root.display(), "Inspecting repository");

        let scan = RepositoryScanner::new(&root, self.config.clone()).scan();
        let mut evidence = Evidence {
            files_scanned: scan.files_scanned,
            ..Evidence::default()
        };
        if scan.truncated {
            evidence
                .notes
                .push(format!("scan stopped after {} files", scan.files_scanned));
        }

        let python = scan
            .primary_manifest(Ecosystem::Python)
            .and_then(|hit| self.read_signal(Ecosystem::Python, hit, &mut evidence));
        let node = scan
            .primary_manifest(Ecosystem::Node)
            .and_then(|hit| self.read_signal(Ecosystem::Node, hit, &mut evidence));

        evidence.has_python_manifest = scan.primary_manifest(Ecosystem::Python).is_some();
        evidence.has_node_manifest = scan.primary_manifest(Ecosystem::Node).is_some();

        let python_framework = python.as_ref().and_then(|s| s.framework);
        let node_framework = node.as_ref().and_then(|s| s.framework);
        evidence.framework = python_framework.or(node_framework);

        // dependencies come from the manifest that decided the framework
        let winner = match evidence.framework.and_then(|f| f.ecosystem()) {
            Some(Ecosystem::Python) => python.as_ref(),
            Some(Ecosystem::Node) => node.as_ref(),
            None => python.as_ref().or(node.as_ref()),
        };
        if let Some(signal) = winner {
            evidence.dependencies = signal.dependencies.clone();
        }

        // a decided framework restricts the port search to its own ecosystem
        let ecosystems: &[Ecosystem] = match evidence.framework.and_then(|f| f.ecosystem()) {
            Some(Ecosystem::Python) => &[Ecosystem::Python],
            Some(Ecosystem::Node) => &[Ecosystem::Node],
            None => &[Ecosystem::Python, Ecosystem::Node],
        };
        let candidates = ecosystems
            .iter()
            .flat_map(|&ecosystem| scan.entrypoints(ecosystem).iter());
        if let Some((port, source)) = port::detect_port(candidates) {
            debug!(port, source = %source, "Detected listening port");
            evidence.port = Some(port);
            evidence.port_source = Some(source);
        }

        info!(
            framework = ?evidence.framework,
            port = ?evidence.port,
            dependencies = evidence.dependencies.len(),
            python_manifest = evidence.has_python_manifest,
            node_manifest = evidence.has_node_manifest,
            "Repository inspection complete"
        );

        Ok(evidence)
    }

    fn check_root(root: &Path) -> Result<PathBuf, InspectError> {
        let metadata = std::fs::metadata(root).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                InspectError::PathNotFound(root.to_path_buf())
            } else {
                InspectError::Unreadable {
                    path: root.to_path_buf(),
                    source,
                }
            }
        })?;
        if !metadata.is_dir() {
            return Err(InspectError::NotADirectory(root.to_path_buf()));
        }
        std::fs::read_dir(root).map_err(|source| InspectError::Unreadable {
            path: root.to_path_buf(),
            source,
        })?;
        Ok(root.to_path_buf())
    }

    fn read_signal(
        &self,
        ecosystem: Ecosystem,
        hit: &scanner::FileHit,
        evidence: &mut Evidence,
    ) -> Option<ManifestSignal> {
        let parsed = match ecosystem {
            Ecosystem::Python => manifest::read_requirements(&hit.path),
            Ecosystem::Node => manifest::read_package_json(&hit.path),
        };

        let dependencies = match parsed {
            Ok(deps) => deps,
            Err(err) => {
                warn!(manifest = %hit.rel_path, error = %err, "Ignoring unparseable manifest");
                evidence.notes.push(format!("{}: {}", hit.rel_path, err));
                return None;
            }
        };

        evidence.manifests.push(hit.rel_path.clone());

        let framework = self.frameworks.detect(ecosystem, &dependencies).or(match ecosystem {
            // any package.json is at least a Node.js application
            Ecosystem::Node => Some(AppType::NodeJs),
            Ecosystem::Python => None,
        });

        debug!(
            manifest = %hit.rel_path,
            framework = ?framework,
            dependencies = dependencies.len(),
            "Read manifest"
        );

        Some(ManifestSignal {
            framework,
            dependencies,
        })
    }
}

impl Default for RepositoryInspector {
    fn default() -> Self {
        Self::new()
    }
}
