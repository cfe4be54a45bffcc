use crate::stack::Ecosystem;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Directories never descended into.
pub const EXCLUDED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "venv",
    ".venv",
    "__pycache__",
    "dist",
    "build",
    ".tox",
    "site-packages",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub max_depth: usize,
    pub max_files: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: 6,
            max_files: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHit {
    pub path: PathBuf,
    pub rel_path: String,
    pub depth: usize,
}

/// Files of interest found by one bounded walk.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub requirements: Vec<FileHit>,
    pub package_json: Vec<FileHit>,
    pub python_entrypoints: Vec<FileHit>,
    pub node_entrypoints: Vec<FileHit>,
    pub files_scanned: usize,
    pub truncated: bool,
}

impl ScanResult {
    /// Shallowest manifest for `ecosystem`; ties go to the lexically smaller path.
    pub fn primary_manifest(&self, ecosystem: Ecosystem) -> Option<&FileHit> {
        match ecosystem {
            Ecosystem::Python => self.requirements.first(),
            Ecosystem::Node => self.package_json.first(),
        }
    }

    pub fn entrypoints(&self, ecosystem: Ecosystem) -> &[FileHit] {
        match ecosystem {
            Ecosystem::Python => &self.python_entrypoints,
            Ecosystem::Node => &self.node_entrypoints,
        }
    }

    fn sort(&mut self) {
        for hits in [&mut self.requirements, &mut self.package_json] {
            hits.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.rel_path.cmp(&b.rel_path)));
        }

        // within one depth, entry points keep their well-known priority order
        sort_by_entrypoint_rank(&mut self.python_entrypoints, Ecosystem::Python);
        sort_by_entrypoint_rank(&mut self.node_entrypoints, Ecosystem::Node);
    }
}

fn entrypoint_rank(ecosystem: Ecosystem, hit: &FileHit) -> usize {
    let filename = hit
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    ecosystem
        .entrypoints()
        .iter()
        .position(|e| *e == filename)
        .unwrap_or(usize::MAX)
}

fn sort_by_entrypoint_rank(hits: &mut [FileHit], ecosystem: Ecosystem) {
    hits.sort_by(|a, b| {
        a.depth
            .cmp(&b.depth)
            .then_with(|| entrypoint_rank(ecosystem, a).cmp(&entrypoint_rank(ecosystem, b)))
            .then_with(|| a.rel_path.cmp(&b.rel_path))
    });
}

/// Bounded directory walk. Depth and file count are enforced here rather
/// than left to the walker's defaults.
pub struct RepositoryScanner {
    root: PathBuf,
    config: ScanConfig,
}

impl RepositoryScanner {
    pub fn new(root: impl Into<PathBuf>, config: ScanConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn scan(&self) -> ScanResult {
        let start = Instant::now();
        let mut result = ScanResult::default();

        debug!(
            root = %self.root.display(),
            max_depth = self.config.max_depth,
            max_files = self.config.max_files,
            "Starting repository scan"
        );

        let walker = WalkBuilder::new(&self.root)
            .max_depth(Some(self.config.max_depth))
            .hidden(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .ignore(false)
            .parents(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(|entry| {
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                !(is_dir
                    && entry
                        .file_name()
                        .to_str()
                        .map(|name| EXCLUDED_DIRS.contains(&name))
                        .unwrap_or(false))
            })
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "Failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }

            if result.files_scanned >= self.config.max_files {
                warn!(
                    files_scanned = result.files_scanned,
                    max_files = self.config.max_files,
                    "Reached file limit, stopping scan"
                );
                result.truncated = true;
                break;
            }
            result.files_scanned += 1;

            let path = entry.path();
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let bucket = if filename == Ecosystem::Python.manifest() {
                &mut result.requirements
            } else if filename == Ecosystem::Node.manifest() {
                &mut result.package_json
            } else if Ecosystem::Python.entrypoints().contains(&filename) {
                &mut result.python_entrypoints
            } else if Ecosystem::Node.entrypoints().contains(&filename) {
                &mut result.node_entrypoints
            } else {
                continue;
            };

            let hit = self.hit(path, entry.depth());
            debug!(path = %hit.rel_path, depth = hit.depth, "Found file of interest");
            bucket.push(hit);
        }

        result.sort();

        info!(
            files_scanned = result.files_scanned,
            requirements = result.requirements.len(),
            package_json = result.package_json.len(),
            scan_time_ms = start.elapsed().as_millis() as u64,
            "Repository scan completed"
        );

        result
    }

    fn hit(&self, path: &Path, walk_depth: usize) -> FileHit {
        let rel_path = path
            .strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        FileHit {
            path: path.to_path_buf(),
            rel_path,
            // walk depth counts the root as 0 and its files as 1
            depth: walk_depth.saturating_sub(1),
        }
    }
}
