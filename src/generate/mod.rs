//! Artifact generation
//!
//! Renders a merged [`AppConfig`] into the five bundle artifacts. Template
//! selection is a table lookup in [`TemplateRegistry`]; the templates are
//! pure interpolation over a precomputed [`RenderContext`], so the whole
//! `(app type, cloud, mode)` space can be tested by enumeration.
//!
//! # Example
//!
//! ```
//! use autodeploy::app_config::AppConfig;
//! use autodeploy::generate::{ArtifactGenerator, GeneratorSettings};
//! use autodeploy::stack::AppType;
//!
//! let generator = ArtifactGenerator::new(GeneratorSettings::default()).unwrap();
//! let bundle = generator.generate(&AppConfig::for_app_type(AppType::Flask)).unwrap();
//! assert_eq!(bundle.len(), 5);
//! assert!(bundle.content("Dockerfile").unwrap().contains("EXPOSE 5000"));
//! ```

pub mod bundle;
pub mod registry;
pub mod render;

pub use bundle::{Artifact, ArtifactBundle, ArtifactKind};
pub use registry::{Fidelity, TemplateKey, TemplateRecord, TemplateRegistry};
pub use render::RenderContext;

use crate::app_config::{AppConfig, ConfigInvariantError};
use crate::stack::CloudProvider;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("No {kind} template for {key}")]
    TemplateSelection { kind: ArtifactKind, key: String },

    #[error("Configuration is invalid: {0}")]
    InvalidConfig(#[from] ConfigInvariantError),

    #[error("Template '{template}' uses disallowed syntax '{token}'; only {{{{ variable }}}} interpolation is allowed")]
    TemplateSyntax { template: String, token: String },

    #[error("Failed to render template '{template}': {reason}")]
    Render { template: String, reason: String },
}

/// Values interpolated into templates that do not come from the `AppConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub aws_region: String,
    pub gcp_region: String,
    pub azure_location: String,
    /// Container CPU units.
    pub cpu: u32,
    /// Container memory in MiB.
    pub memory: u32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            aws_region: "us-west-2".to_string(),
            gcp_region: "us-central1".to_string(),
            azure_location: "eastus".to_string(),
            cpu: 256,
            memory: 512,
        }
    }
}

impl GeneratorSettings {
    pub fn region(&self, cloud: CloudProvider) -> &str {
        match cloud {
            CloudProvider::Aws => &self.aws_region,
            CloudProvider::Gcp => &self.gcp_region,
            CloudProvider::Azure => &self.azure_location,
        }
    }
}

#[derive(Debug)]
pub struct ArtifactGenerator {
    registry: TemplateRegistry,
    settings: GeneratorSettings,
}

impl ArtifactGenerator {
    pub fn new(settings: GeneratorSettings) -> Result<Self, GenerateError> {
        Ok(Self::with_registry(TemplateRegistry::standard()?, settings))
    }

    pub fn with_registry(registry: TemplateRegistry, settings: GeneratorSettings) -> Self {
        Self { registry, settings }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Renders all five artifacts. Fails only for a config that violates its
    /// invariants or a key the registry does not model.
    pub fn generate(&self, config: &AppConfig) -> Result<ArtifactBundle, GenerateError> {
        config.validate()?;

        let container = self.registry.lookup(&TemplateKey::Container(config.app_type))?;
        let infra = self.registry.lookup(&TemplateKey::Infrastructure(
            config.cloud_provider,
            config.deployment_mode,
        ))?;
        let rollout = self.registry.lookup(&TemplateKey::Rollout(
            config.cloud_provider,
            config.deployment_mode,
        ))?;
        let deploy = self
            .registry
            .lookup(&TemplateKey::DeployScript(config.cloud_provider))?;
        let compose = self.registry.lookup(&TemplateKey::Compose)?;
        let instructions = self.registry.lookup(&TemplateKey::Instructions)?;

        let limitations: Vec<String> = [container, infra, rollout, deploy, compose]
            .iter()
            .filter_map(|record| record.fidelity.note())
            .map(String::from)
            .collect();
        for note in &limitations {
            warn!(config = %config, limitation = %note, "Using best-effort template");
        }

        let mut context = RenderContext::new(config, &self.settings);
        context.rollout_command = self.registry.render(rollout, &context)?;
        context.limitations = render::bullet_list(&limitations);

        let selected = [
            (ArtifactKind::Container, container),
            (ArtifactKind::Infrastructure, infra),
            (ArtifactKind::DeployScript, deploy),
            (ArtifactKind::Compose, compose),
            (ArtifactKind::Instructions, instructions),
        ];

        let mut artifacts = Vec::with_capacity(selected.len());
        for (kind, record) in selected {
            let content = self.registry.render(record, &context)?;
            debug!(
                artifact = kind.filename(),
                template = record.name,
                bytes = content.len(),
                "Rendered artifact"
            );
            artifacts.push(Artifact {
                kind,
                filename: kind.filename(),
                template: record.name,
                content,
            });
        }

        info!(
            name = %config.name,
            app_type = %config.app_type,
            cloud = %config.cloud_provider,
            mode = %config.deployment_mode,
            artifacts = artifacts.len(),
            "Generated deployment bundle"
        );

        Ok(ArtifactBundle::new(config.clone(), artifacts, limitations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::{AppType, DeploymentMode};
    use yare::parameterized;

    fn generator() -> ArtifactGenerator {
        ArtifactGenerator::new(GeneratorSettings::default()).unwrap()
    }

    fn config(app_type: AppType, cloud: CloudProvider, mode: DeploymentMode) -> AppConfig {
        AppConfig {
            cloud_provider: cloud,
            deployment_mode: mode,
            ..AppConfig::for_app_type(app_type)
        }
    }

    #[parameterized(
        flask = { AppType::Flask },
        django = { AppType::Django },
        nodejs = { AppType::NodeJs },
        express = { AppType::Express },
        react = { AppType::React },
        generic = { AppType::Generic },
    )]
    fn test_every_combination_renders_five_artifacts(app_type: AppType) {
        let generator = generator();
        for cloud in CloudProvider::all_variants() {
            for mode in DeploymentMode::all_variants() {
                let cfg = config(app_type, *cloud, *mode);
                let bundle = generator.generate(&cfg).unwrap();

                assert_eq!(bundle.len(), 5, "{cfg}");
                assert_eq!(
                    bundle.filenames(),
                    vec!["Dockerfile", "main.tf", "deploy.sh", "docker-compose.yml", "README.md"]
                );
                for artifact in bundle.iter() {
                    assert!(!artifact.content.trim().is_empty(), "{cfg}: {}", artifact.filename);
                    assert!(!artifact.content.contains("{{"), "{cfg}: {}", artifact.filename);
                }

                let port = cfg.port.to_string();
                assert!(bundle.content("Dockerfile").unwrap().contains(&format!("EXPOSE {port}")));
                assert!(bundle
                    .content("docker-compose.yml")
                    .unwrap()
                    .contains(&format!("\"{port}:{port}\"")));
                assert!(bundle.content("main.tf").unwrap().contains(&cfg.name));
                assert!(bundle.content("deploy.sh").unwrap().starts_with("#!/usr/bin/env bash"));
            }
        }
    }

    #[test]
    fn test_flask_dockerfile() {
        let bundle = generator()
            .generate(&AppConfig::for_app_type(AppType::Flask))
            .unwrap();
        let dockerfile = bundle.content("Dockerfile").unwrap();
        assert!(dockerfile.contains("pip install --no-cache-dir -r requirements.txt"));
        assert!(dockerfile.contains("EXPOSE 5000"));
        assert!(dockerfile.contains(r#"CMD ["python", "app.py"]"#));
    }

    #[test]
    fn test_django_dockerfile_binds_port() {
        let mut cfg = AppConfig::for_app_type(AppType::Django);
        cfg.port = 8000;
        let bundle = generator().generate(&cfg).unwrap();
        let dockerfile = bundle.content("Dockerfile").unwrap();
        assert!(dockerfile.contains("collectstatic --noinput"));
        assert!(dockerfile.contains("0.0.0.0:8000"));
    }

    #[test]
    fn test_node_family_shares_container_template() {
        let generator = generator();
        let express = generator
            .generate(&AppConfig::for_app_type(AppType::Express))
            .unwrap();
        assert_eq!(express.get(ArtifactKind::Container).unwrap().template, "docker_node");
        assert!(express.content("Dockerfile").unwrap().contains(r#"CMD ["npm", "start"]"#));

        let react = generator
            .generate(&AppConfig::for_app_type(AppType::React))
            .unwrap();
        assert!(react.content("Dockerfile").unwrap().contains("npm run build"));
    }

    #[parameterized(
        container = { DeploymentMode::Container, "aws_ecs_task_definition" },
        serverless = { DeploymentMode::Serverless, "aws_lambda_function" },
        vm = { DeploymentMode::Vm, "aws_instance" },
    )]
    fn test_aws_infrastructure_by_mode(mode: DeploymentMode, resource: &str) {
        let cfg = config(AppType::Flask, CloudProvider::Aws, mode);
        let bundle = generator().generate(&cfg).unwrap();
        let main_tf = bundle.content("main.tf").unwrap();
        assert!(main_tf.contains(resource));
        assert!(main_tf.contains("region = \"us-west-2\""));
        assert!(bundle.limitations.is_empty());
    }

    #[test]
    fn test_aws_container_task_sizing() {
        let bundle = generator().generate(&AppConfig::default()).unwrap();
        let main_tf = bundle.content("main.tf").unwrap();
        assert!(main_tf.contains("requires_compatibilities = [\"FARGATE\"]"));
        assert!(main_tf.contains("cpu                      = 256"));
        assert!(main_tf.contains("memory                   = 512"));
    }

    #[test]
    fn test_deploy_script_order() {
        let bundle = generator().generate(&AppConfig::default()).unwrap();
        let script = bundle.content("deploy.sh").unwrap();

        let steps = [
            "command -v",
            "docker build",
            "docker push",
            "terraform init",
            "terraform apply -auto-approve",
            "aws ecs update-service --cluster myapp-cluster",
        ];
        let positions: Vec<usize> = steps
            .iter()
            .map(|step| script.find(step).unwrap_or_else(|| panic!("missing {step}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn test_best_effort_is_reported() {
        let cfg = config(AppType::Generic, CloudProvider::Azure, DeploymentMode::Serverless);
        let bundle = generator().generate(&cfg).unwrap();
        assert_eq!(bundle.limitations.len(), 1);
        assert!(bundle.limitations[0].contains("Azure Functions"));
        let readme = bundle.content("README.md").unwrap();
        assert!(readme.contains(&format!("- {}", bundle.limitations[0])));
        assert!(bundle.content("main.tf").unwrap().contains("location            = \"eastus\""));
    }

    #[test]
    fn test_readme_restates_config() {
        let mut cfg = AppConfig::for_app_type(AppType::Express);
        cfg.name = "orders-api".to_string();
        cfg.port = 8080;
        cfg.dependencies.insert("express".to_string());

        let bundle = generator().generate(&cfg).unwrap();
        let readme = bundle.content("README.md").unwrap();
        assert!(readme.starts_with("# Orders Api Deployment"));
        assert!(readme.contains("- **Port**: 8080"));
        assert!(readme.contains("- **Application type**: Express"));
        assert!(readme.contains("- **Dependencies**: express"));
        assert!(readme.contains("- None for this configuration."));
        for filename in ArtifactKind::ALL.iter().map(|k| k.filename()) {
            assert!(readme.contains(&format!("`{filename}`")));
        }
    }

    #[test]
    fn test_custom_region() {
        let settings = GeneratorSettings {
            aws_region: "eu-central-1".to_string(),
            ..GeneratorSettings::default()
        };
        let bundle = ArtifactGenerator::new(settings)
            .unwrap()
            .generate(&AppConfig::default())
            .unwrap();
        assert!(bundle.content("main.tf").unwrap().contains("eu-central-1"));
        assert!(bundle.content("deploy.sh").unwrap().contains("REGION=\"eu-central-1\""));
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let cfg = AppConfig {
            port: 0,
            ..AppConfig::default()
        };
        let err = generator().generate(&cfg).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::InvalidConfig(ConfigInvariantError::PortOutOfRange(0))
        ));
    }

    #[test]
    fn test_missing_combination_is_a_selection_error() {
        let mut registry = TemplateRegistry::standard().unwrap();
        registry.remove(&TemplateKey::Infrastructure(
            CloudProvider::Gcp,
            DeploymentMode::Serverless,
        ));
        let generator = ArtifactGenerator::with_registry(registry, GeneratorSettings::default());

        let cfg = config(AppType::Flask, CloudProvider::Gcp, DeploymentMode::Serverless);
        let err = generator.generate(&cfg).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::TemplateSelection {
                kind: ArtifactKind::Infrastructure,
                ..
            }
        ));

        // the rest of the key space is unaffected
        let cfg = config(AppType::Flask, CloudProvider::Gcp, DeploymentMode::Container);
        assert!(generator.generate(&cfg).is_ok());
    }
}
