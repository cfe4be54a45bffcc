use crate::stack::AppType;
use serde::Serialize;

/// Repository-derived signals. Every field is optional in spirit: `None`,
/// an empty list or `false` means "no signal" and is never merged over a
/// default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Evidence {
    pub framework: Option<AppType>,
    pub port: Option<u16>,
    pub dependencies: Vec<String>,
    pub has_python_manifest: bool,
    pub has_node_manifest: bool,
    /// Manifests that contributed, relative to the repository root.
    pub manifests: Vec<String>,
    /// Entry-point file the port was read from.
    pub port_source: Option<String>,
    /// Non-fatal problems, such as a manifest that failed to parse.
    pub notes: Vec<String>,
    pub files_scanned: usize,
}

impl Evidence {
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no field carries a signal the merger would act on.
    pub fn is_empty(&self) -> bool {
        self.framework.is_none() && self.port.is_none() && self.dependencies.is_empty()
    }

    pub fn summary(&self) -> String {
        let framework = self
            .framework
            .map(|f| f.to_string())
            .unwrap_or_else(|| "none".to_string());
        let port = self
            .port
            .map(|p| p.to_string())
            .unwrap_or_else(|| "none".to_string());
        format!(
            "framework={}, port={}, dependencies={}",
            framework,
            port,
            self.dependencies.len()
        )
    }
}
