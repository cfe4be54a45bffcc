use crate::app_config::is_safe_name;
use crate::generate::ArtifactBundle;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Persists a bundle under `<root>/deployment_<name>/`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundleWriter;

impl BundleWriter {
    pub fn new() -> Self {
        Self
    }

    /// Writes every artifact and returns the bundle directory. Existing files
    /// with the same names are overwritten.
    pub fn write(&self, bundle: &ArtifactBundle, root: &Path) -> Result<PathBuf> {
        let name = &bundle.config.name;
        if !is_safe_name(name) {
            bail!("Refusing to write bundle for unsafe application name '{}'", name);
        }

        let dir = root.join(bundle.output_dir_name());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        for artifact in bundle.iter() {
            let path = dir.join(artifact.filename);
            fs::write(&path, &artifact.content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if artifact.kind.is_executable() {
                make_executable(&path)?;
            }
            debug!(path = %path.display(), bytes = artifact.content.len(), "Wrote artifact");
        }

        info!(dir = %dir.display(), files = bundle.len(), "Bundle written");
        Ok(dir)
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("Failed to mark {} executable", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
