use crate::app_config::AppConfig;
use serde::Serialize;
use std::fmt;

/// The five artifacts every bundle carries, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Container,
    Infrastructure,
    DeployScript,
    Compose,
    Instructions,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Container,
        ArtifactKind::Infrastructure,
        ArtifactKind::DeployScript,
        ArtifactKind::Compose,
        ArtifactKind::Instructions,
    ];

    pub fn filename(&self) -> &'static str {
        match self {
            ArtifactKind::Container => "Dockerfile",
            ArtifactKind::Infrastructure => "main.tf",
            ArtifactKind::DeployScript => "deploy.sh",
            ArtifactKind::Compose => "docker-compose.yml",
            ArtifactKind::Instructions => "README.md",
        }
    }

    pub fn is_executable(&self) -> bool {
        matches!(self, ArtifactKind::DeployScript)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArtifactKind::Container => "container definition",
            ArtifactKind::Infrastructure => "infrastructure definition",
            ArtifactKind::DeployScript => "deploy script",
            ArtifactKind::Compose => "compose definition",
            ArtifactKind::Instructions => "instructions",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub filename: &'static str,
    /// Template the content was rendered from.
    pub template: &'static str,
    pub content: String,
}

/// Rendered artifacts for one configuration, ordered as [`ArtifactKind::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactBundle {
    pub config: AppConfig,
    artifacts: Vec<Artifact>,
    pub limitations: Vec<String>,
}

impl ArtifactBundle {
    pub(crate) fn new(config: AppConfig, artifacts: Vec<Artifact>, limitations: Vec<String>) -> Self {
        Self {
            config,
            artifacts,
            limitations,
        }
    }

    pub fn get(&self, kind: ArtifactKind) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }

    /// Content of the artifact written to `filename`.
    pub fn content(&self, filename: &str) -> Option<&str> {
        self.artifacts
            .iter()
            .find(|a| a.filename == filename)
            .map(|a| a.content.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn filenames(&self) -> Vec<&'static str> {
        self.artifacts.iter().map(|a| a.filename).collect()
    }

    /// Directory name under the output root, `deployment_<name>`.
    pub fn output_dir_name(&self) -> String {
        self.config.output_dir_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filenames_in_order() {
        let names: Vec<&str> = ArtifactKind::ALL.iter().map(|k| k.filename()).collect();
        assert_eq!(
            names,
            vec!["Dockerfile", "main.tf", "deploy.sh", "docker-compose.yml", "README.md"]
        );
    }

    #[test]
    fn test_only_deploy_script_is_executable() {
        let executable: Vec<ArtifactKind> = ArtifactKind::ALL
            .into_iter()
            .filter(|k| k.is_executable())
            .collect();
        assert_eq!(executable, vec![ArtifactKind::DeployScript]);
    }

    #[test]
    fn test_bundle_lookup() {
        let artifacts = vec![Artifact {
            kind: ArtifactKind::Container,
            filename: "Dockerfile",
            template: "docker_generic",
            content: "FROM scratch\n".to_string(),
        }];
        let bundle = ArtifactBundle::new(AppConfig::default(), artifacts, Vec::new());
        assert_eq!(bundle.len(), 1);
        assert_eq!(bundle.content("Dockerfile"), Some("FROM scratch\n"));
        assert!(bundle.get(ArtifactKind::Compose).is_none());
        assert_eq!(bundle.output_dir_name(), "deployment_myapp");
    }
}
