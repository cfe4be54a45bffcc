//! Archive extraction (gzipped tarballs and ZIP) with a size ceiling.

use super::FetchError;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Unpacked content may be at most this many times the archive ceiling.
pub const UNPACK_RATIO: u64 = 8;

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const ZIP_MAGIC: &[&[u8]] = &[b"PK\x03\x04", b"PK\x05\x06"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    Zip,
}

impl ArchiveFormat {
    /// Format named by a URL's file extension.
    pub fn from_url(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
        if path.ends_with(".tar.gz") || path.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if path.ends_with(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }

    /// Format given by the leading magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(GZIP_MAGIC) {
            Some(Self::TarGz)
        } else if ZIP_MAGIC.iter().any(|magic| data.starts_with(magic)) {
            Some(Self::Zip)
        } else {
            None
        }
    }
}

/// Unpacks a downloaded archive, trusting its magic bytes over the extension
/// of the URL it came from.
pub fn unpack(
    data: &[u8],
    url: &str,
    dest: &Path,
    max_unpacked: u64,
) -> Result<PathBuf, FetchError> {
    match ArchiveFormat::sniff(data).or_else(|| ArchiveFormat::from_url(url)) {
        Some(ArchiveFormat::TarGz) => unpack_tar_gz(data, dest, max_unpacked),
        Some(ArchiveFormat::Zip) => unpack_zip(data, dest, max_unpacked),
        None => Err(FetchError::UnsupportedArchive(url.to_string())),
    }
}

/// Unpacks `data` into `dest` and returns the repository root.
///
/// Entries that would land outside `dest` are skipped. Hosting services wrap
/// the tree in a single `<repo>-<ref>/` directory; when the archive holds
/// exactly one top-level directory that directory is the root.
pub fn unpack_tar_gz(data: &[u8], dest: &Path, max_unpacked: u64) -> Result<PathBuf, FetchError> {
    if data.is_empty() {
        return Err(FetchError::Extraction("archive is empty".to_string()));
    }

    let mut archive = tar::Archive::new(MultiGzDecoder::new(data));
    let entries = archive
        .entries()
        .map_err(|e| FetchError::Extraction(format!("invalid tar.gz archive: {e}")))?;

    let mut unpacked: u64 = 0;
    let mut count = 0usize;
    for entry in entries {
        let mut entry =
            entry.map_err(|e| FetchError::Extraction(format!("corrupt archive entry: {e}")))?;

        unpacked = unpacked.saturating_add(entry.header().size().unwrap_or(0));
        if unpacked > max_unpacked {
            return Err(FetchError::TooLarge {
                limit: max_unpacked,
                actual: unpacked,
            });
        }

        let inside = entry
            .unpack_in(dest)
            .map_err(|e| FetchError::Extraction(format!("failed to unpack entry: {e}")))?;
        if !inside {
            let path = entry
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            warn!(entry = %path, "Skipping archive entry outside the target directory");
            continue;
        }
        count += 1;
    }

    if count == 0 {
        return Err(FetchError::Extraction("archive contains no entries".to_string()));
    }

    let root = single_top_level_dir(dest)?.unwrap_or_else(|| dest.to_path_buf());
    debug!(entries = count, bytes = unpacked, root = %root.display(), "Unpacked archive");
    Ok(root)
}

/// ZIP counterpart of [`unpack_tar_gz`] with the same ceiling, traversal
/// guard and wrapper-directory handling.
pub fn unpack_zip(data: &[u8], dest: &Path, max_unpacked: u64) -> Result<PathBuf, FetchError> {
    if data.is_empty() {
        return Err(FetchError::Extraction("archive is empty".to_string()));
    }

    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| FetchError::Extraction(format!("invalid zip archive: {e}")))?;

    let mut unpacked: u64 = 0;
    let mut count = 0usize;
    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| FetchError::Extraction(format!("corrupt archive entry: {e}")))?;

        let Some(relative) = file.enclosed_name().map(|p| p.to_path_buf()) else {
            warn!(entry = %file.name(), "Skipping archive entry outside the target directory");
            continue;
        };
        let target = dest.join(relative);

        if file.is_dir() {
            std::fs::create_dir_all(&target)?;
            count += 1;
            continue;
        }

        unpacked = unpacked.saturating_add(file.size());
        if unpacked > max_unpacked {
            return Err(FetchError::TooLarge {
                limit: max_unpacked,
                actual: unpacked,
            });
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        // the declared size is not trusted
        let remaining = max_unpacked - (unpacked - file.size());
        let written = std::io::copy(&mut (&mut file).take(remaining.saturating_add(1)), &mut out)
            .map_err(|e| FetchError::Extraction(format!("failed to unpack entry: {e}")))?;
        if written > remaining {
            return Err(FetchError::TooLarge {
                limit: max_unpacked,
                actual: unpacked - file.size() + written,
            });
        }
        count += 1;
    }

    if count == 0 {
        return Err(FetchError::Extraction("archive contains no entries".to_string()));
    }

    let root = single_top_level_dir(dest)?.unwrap_or_else(|| dest.to_path_buf());
    debug!(entries = count, bytes = unpacked, root = %root.display(), "Unpacked zip archive");
    Ok(root)
}

fn single_top_level_dir(dest: &Path) -> Result<Option<PathBuf>, FetchError> {
    let mut children = std::fs::read_dir(dest)?
        .filter_map(|e| e.ok())
        .map(|e| e.path());

    match (children.next(), children.next()) {
        (Some(only), None) if only.is_dir() => Ok(Some(only)),
        _ => Ok(None),
    }
}
