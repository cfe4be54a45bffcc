use super::archive::ArchiveFormat;
use super::FetchError;
use reqwest::Url;
use std::fmt;
use std::path::PathBuf;

pub const GITHUB_BASE: &str = "https://github.com";

/// Branches tried, in order, when a GitHub locator names none.
pub const DEFAULT_BRANCHES: &[&str] = &["main", "master"];

/// Where a repository comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryLocator {
    GitHub {
        owner: String,
        repo: String,
        branch: Option<String>,
    },
    /// Direct link to a gzipped tarball or a ZIP archive.
    Archive { url: String },
    /// A directory that already exists on this machine.
    LocalPath(PathBuf),
}

impl RepositoryLocator {
    /// Parses a GitHub URL, a `.tar.gz`/`.tgz`/`.zip` URL or an existing
    /// local directory.
    ///
    /// GitHub `/archive/<ref>.zip` links are rewritten to the matching
    /// tarball so every GitHub download takes the same path.
    pub fn parse(input: &str) -> Result<Self, FetchError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(FetchError::InvalidLocator("empty locator".to_string()));
        }

        let lowered = input.to_ascii_lowercase();
        if lowered.starts_with("http://") || lowered.starts_with("https://") {
            return Self::parse_url(input);
        }
        if lowered.starts_with("github.com/") || lowered.starts_with("www.github.com/") {
            return Self::parse_url(&format!("https://{input}"));
        }

        let path = PathBuf::from(input);
        if path.is_dir() {
            return Ok(Self::LocalPath(path));
        }
        Err(FetchError::InvalidLocator(format!(
            "'{input}' is neither a URL nor an existing directory"
        )))
    }

    fn parse_url(input: &str) -> Result<Self, FetchError> {
        let url = Url::parse(input)
            .map_err(|e| FetchError::InvalidLocator(format!("{input}: {e}")))?;
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();

        if host == "github.com" || host == "www.github.com" {
            return Self::parse_github(&url, input);
        }

        if ArchiveFormat::from_url(url.path()).is_some() {
            return Ok(Self::Archive {
                url: url.to_string(),
            });
        }
        Err(FetchError::UnsupportedHost(host))
    }

    fn parse_github(url: &Url, input: &str) -> Result<Self, FetchError> {
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let (owner, repo) = match segments.as_slice() {
            [owner, repo, ..] => (owner.to_string(), repo.trim_end_matches(".git").to_string()),
            _ => {
                return Err(FetchError::InvalidLocator(format!(
                    "{input}: expected https://github.com/<owner>/<repo>"
                )))
            }
        };

        match segments.get(2).copied() {
            None => Ok(Self::GitHub {
                owner,
                repo,
                branch: None,
            }),
            Some("tree") if segments.len() > 3 => Ok(Self::GitHub {
                owner,
                repo,
                branch: Some(segments[3..].join("/")),
            }),
            Some("archive") if segments.len() > 3 => {
                let file = segments[3..].join("/");
                let reference = file
                    .strip_suffix(".zip")
                    .or_else(|| file.strip_suffix(".tar.gz"))
                    .ok_or_else(|| FetchError::UnsupportedArchive(input.to_string()))?;
                Ok(Self::Archive {
                    url: format!("{GITHUB_BASE}/{owner}/{repo}/archive/{reference}.tar.gz"),
                })
            }
            Some(_) => Err(FetchError::InvalidLocator(format!(
                "{input}: unrecognized GitHub URL form"
            ))),
        }
    }

    /// Candidate download URLs, tried in order.
    pub fn archive_urls(&self, github_base: &str) -> Vec<String> {
        let github_base = github_base.trim_end_matches('/');
        match self {
            Self::GitHub {
                owner,
                repo,
                branch,
            } => {
                let branches: Vec<&str> = match branch {
                    Some(b) => vec![b.as_str()],
                    None => DEFAULT_BRANCHES.to_vec(),
                };
                branches
                    .into_iter()
                    .map(|b| format!("{github_base}/{owner}/{repo}/archive/refs/heads/{b}.tar.gz"))
                    .collect()
            }
            Self::Archive { url } => vec![url.clone()],
            Self::LocalPath(_) => Vec::new(),
        }
    }

    pub fn is_remote(&self) -> bool {
        !matches!(self, Self::LocalPath(_))
    }
}

impl fmt::Display for RepositoryLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub {
                owner,
                repo,
                branch: Some(branch),
            } => write!(f, "github:{owner}/{repo}@{branch}"),
            Self::GitHub { owner, repo, .. } => write!(f, "github:{owner}/{repo}"),
            Self::Archive { url } => write!(f, "{url}"),
            Self::LocalPath(path) => write!(f, "{}", path.display()),
        }
    }
}
