use super::archive::{self, UNPACK_RATIO};
use super::{FetchConfig, FetchError, FetchedRepository, RepositoryFetcher, RepositoryLocator};
use std::io::Read;
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Downloads tarballs and ZIP archives over HTTP(S) with a blocking client.
///
/// Local locators are handed back as-is, so this is the only fetcher the
/// binary needs.
pub struct HttpArchiveFetcher {
    client: reqwest::blocking::Client,
    config: FetchConfig,
}

impl HttpArchiveFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| FetchError::Network {
                url: String::new(),
                source,
            })?;
        Ok(Self::with_client(client, config))
    }

    /// Uses a preconfigured client; its own timeout takes precedence.
    pub fn with_client(client: reqwest::blocking::Client, config: FetchConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                secs: self.config.timeout.as_secs(),
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                source: err,
            }
        }
    }

    /// Downloads `url` into memory, enforcing the archive ceiling both on the
    /// advertised `Content-Length` and on the bytes actually received.
    pub fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let limit = self.config.max_archive_bytes;
        debug!(url, limit, "Downloading archive");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(advertised) = response.content_length() {
            if advertised > limit {
                return Err(FetchError::TooLarge {
                    limit,
                    actual: advertised,
                });
            }
        }

        let mut body = Vec::new();
        response
            .take(limit.saturating_add(1))
            .read_to_end(&mut body)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::TimedOut {
                    FetchError::Timeout {
                        url: url.to_string(),
                        secs: self.config.timeout.as_secs(),
                    }
                } else {
                    FetchError::Io(e)
                }
            })?;

        let received = body.len() as u64;
        if received > limit {
            return Err(FetchError::TooLarge {
                limit,
                actual: received,
            });
        }

        debug!(url, bytes = received, "Downloaded archive");
        Ok(body)
    }

    fn fetch_remote(&self, locator: &RepositoryLocator) -> Result<FetchedRepository, FetchError> {
        let urls = locator.archive_urls(&self.config.github_base);
        let mut last_error = None;

        for (i, url) in urls.iter().enumerate() {
            let has_fallback = i + 1 < urls.len();
            match self.download(url) {
                Ok(data) => {
                    let workdir = TempDir::new()?;
                    let max_unpacked = self.config.max_archive_bytes.saturating_mul(UNPACK_RATIO);
                    let root = archive::unpack(&data, url, workdir.path(), max_unpacked)?;
                    info!(source = %url, root = %root.display(), "Repository fetched");
                    return Ok(FetchedRepository::unpacked(root, url.clone(), workdir));
                }
                Err(FetchError::HttpStatus { status: 404, .. }) if has_fallback => {
                    warn!(url = %url, "Archive not found, trying next branch");
                    last_error = Some(FetchError::HttpStatus {
                        url: url.clone(),
                        status: 404,
                    });
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            FetchError::InvalidLocator(format!("no download URL for {locator}"))
        }))
    }
}

impl RepositoryFetcher for HttpArchiveFetcher {
    fn fetch(&self, locator: &RepositoryLocator) -> Result<FetchedRepository, FetchError> {
        match locator {
            RepositoryLocator::LocalPath(path) => {
                if !path.is_dir() {
                    return Err(FetchError::InvalidLocator(format!(
                        "{} is not a directory",
                        path.display()
                    )));
                }
                debug!(path = %path.display(), "Using local repository");
                Ok(FetchedRepository::local(path.clone()))
            }
            remote => self.fetch_remote(remote),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::archive::tests::{tar_gz, zip_bytes};
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;
    use std::time::Duration;

    /// Serves each canned response on its own connection, then exits.
    fn serve(responses: Vec<Vec<u8>>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let mut paths = Vec::new();
            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                paths.push(request_line.split_whitespace().nth(1).unwrap_or("").to_string());
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                        break;
                    }
                }
                stream.write_all(&response).unwrap();
                stream.flush().unwrap();
            }
            paths
        });
        (base, handle)
    }

    fn http_response(status: &str, body: &[u8]) -> Vec<u8> {
        let mut out = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .into_bytes();
        out.extend_from_slice(body);
        out
    }

    fn fetcher(github_base: &str, max_archive_bytes: u64) -> HttpArchiveFetcher {
        let config = FetchConfig {
            timeout: Duration::from_secs(5),
            max_archive_bytes,
            github_base: github_base.to_string(),
        };
        // loopback servers must not be routed through an ambient proxy
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .no_proxy()
            .build()
            .unwrap();
        HttpArchiveFetcher::with_client(client, config)
    }

    #[test]
    fn test_fetch_archive() {
        let archive = tar_gz(&[("app-main/requirements.txt", "flask\n")]);
        let (base, server) = serve(vec![http_response("200 OK", &archive)]);
        let locator = RepositoryLocator::Archive {
            url: format!("{base}/app.tar.gz"),
        };

        let repo = fetcher(&base, 1 << 20).fetch(&locator).unwrap();
        assert!(repo.is_temporary());
        assert!(repo.root().join("requirements.txt").is_file());
        assert_eq!(server.join().unwrap(), vec!["/app.tar.gz"]);
    }

    #[test]
    fn test_fetch_zip_archive() {
        let archive = zip_bytes(&[
            ("app-1.0/requirements.txt", "django\n"),
            ("app-1.0/manage.py", ""),
        ]);
        let (base, server) = serve(vec![http_response("200 OK", &archive)]);
        let locator = RepositoryLocator::parse(&format!("{base}/downloads/app.zip")).unwrap();

        let repo = fetcher(&base, 1 << 20).fetch(&locator).unwrap();
        assert!(repo.is_temporary());
        assert!(repo.root().ends_with("app-1.0"));
        assert!(repo.root().join("requirements.txt").is_file());
        assert_eq!(server.join().unwrap(), vec!["/downloads/app.zip"]);
    }

    #[test]
    fn test_github_falls_back_to_master() {
        let archive = tar_gz(&[("shop-master/package.json", "{}")]);
        let (base, server) = serve(vec![
            http_response("404 Not Found", b""),
            http_response("200 OK", &archive),
        ]);
        let locator = RepositoryLocator::GitHub {
            owner: "acme".to_string(),
            repo: "shop".to_string(),
            branch: None,
        };

        let repo = fetcher(&base, 1 << 20).fetch(&locator).unwrap();
        assert!(repo.root().join("package.json").is_file());
        assert_eq!(
            server.join().unwrap(),
            vec![
                "/acme/shop/archive/refs/heads/main.tar.gz",
                "/acme/shop/archive/refs/heads/master.tar.gz"
            ]
        );
    }

    #[test]
    fn test_http_error_status() {
        let (base, server) = serve(vec![http_response("500 Internal Server Error", b"")]);
        let locator = RepositoryLocator::Archive {
            url: format!("{base}/app.tar.gz"),
        };
        let err = fetcher(&base, 1 << 20).fetch(&locator).unwrap_err();
        assert!(matches!(err, FetchError::HttpStatus { status: 500, .. }));
        server.join().unwrap();
    }

    #[test]
    fn test_content_length_over_limit() {
        let body = vec![0u8; 4096];
        let (base, server) = serve(vec![http_response("200 OK", &body)]);
        let locator = RepositoryLocator::Archive {
            url: format!("{base}/big.tar.gz"),
        };
        let err = fetcher(&base, 1024).fetch(&locator).unwrap_err();
        assert!(matches!(
            err,
            FetchError::TooLarge {
                limit: 1024,
                actual: 4096
            }
        ));
        let _ = server.join();
    }

    #[test]
    fn test_refused_connection_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let locator = RepositoryLocator::Archive {
            url: format!("http://{addr}/app.tar.gz"),
        };
        let err = fetcher("http://127.0.0.1:9", 1 << 20)
            .fetch(&locator)
            .unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }), "got {err:?}");
    }

    #[test]
    fn test_local_path_is_used_in_place() {
        let dir = tempfile::TempDir::new().unwrap();
        let locator = RepositoryLocator::LocalPath(dir.path().to_path_buf());
        let repo = fetcher(GITHUB_BASE_FOR_TESTS, 1 << 20).fetch(&locator).unwrap();
        assert_eq!(repo.root(), dir.path());
        assert!(!repo.is_temporary());
    }

    const GITHUB_BASE_FOR_TESTS: &str = "http://127.0.0.1:9";
}
