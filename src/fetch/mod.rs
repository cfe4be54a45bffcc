//! Repository fetch capability
//!
//! Resolves a [`RepositoryLocator`] to a local directory. Local paths are
//! used in place; remote locators are downloaded as a gzipped tarball or a
//! ZIP archive with a timeout and a size ceiling and unpacked into a
//! temporary directory that lives as long as the returned
//! [`FetchedRepository`].
//!
//! Every failure here is a repository access failure: the pipeline reports it
//! and carries on with the intent-only configuration.

pub mod archive;
pub mod http;
pub mod locator;

pub use http::HttpArchiveFetcher;
pub use locator::{RepositoryLocator, DEFAULT_BRANCHES, GITHUB_BASE};

use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid repository locator: {0}")]
    InvalidLocator(String),

    #[error("Unsupported repository host '{0}' (expected github.com or a .tar.gz/.zip URL)")]
    UnsupportedHost(String),

    #[error("Unsupported archive format: {0} (expected .tar.gz, .tgz or .zip)")]
    UnsupportedArchive(String),

    #[error("Failed to download {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Timed out after {secs}s downloading {url}")]
    Timeout { url: String, secs: u64 },

    #[error("Download of {url} failed with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Archive exceeds the {limit} byte limit ({actual} bytes)")]
    TooLarge { limit: u64, actual: u64 },

    #[error("Failed to extract archive: {0}")]
    Extraction(String),

    #[error("I/O error while fetching repository: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub max_archive_bytes: u64,
    pub github_base: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_archive_bytes: 100 * 1024 * 1024,
            github_base: GITHUB_BASE.to_string(),
        }
    }
}

/// A repository tree on local disk. Temporary trees are deleted on drop.
#[derive(Debug)]
pub struct FetchedRepository {
    root: PathBuf,
    source: String,
    _workdir: Option<TempDir>,
}

impl FetchedRepository {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        let root = path.into();
        Self {
            source: root.display().to_string(),
            root,
            _workdir: None,
        }
    }

    pub fn unpacked(root: PathBuf, source: String, workdir: TempDir) -> Self {
        Self {
            root,
            source,
            _workdir: Some(workdir),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL or path the tree was obtained from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_temporary(&self) -> bool {
        self._workdir.is_some()
    }
}

pub trait RepositoryFetcher: Send + Sync {
    fn fetch(&self, locator: &RepositoryLocator) -> Result<FetchedRepository, FetchError>;
}
