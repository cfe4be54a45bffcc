//! Template selection table.
//!
//! Every branch of artifact generation is a lookup here. Container templates
//! are keyed by app type, infrastructure and rollout by provider and mode,
//! deploy scripts by provider. Templates themselves are plain interpolation.

use super::bundle::ArtifactKind;
use super::render::{check_template_syntax, template_environment};
use super::GenerateError;
use crate::stack::{AppType, CloudProvider, DeploymentMode};
use crate::stack::{AppType as A, CloudProvider as C, DeploymentMode as M};
use minijinja::Environment;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateKey {
    Container(AppType),
    Infrastructure(CloudProvider, DeploymentMode),
    /// Final command of the deploy script.
    Rollout(CloudProvider, DeploymentMode),
    DeployScript(CloudProvider),
    Compose,
    Instructions,
}

impl TemplateKey {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            TemplateKey::Container(_) => ArtifactKind::Container,
            TemplateKey::Infrastructure(..) => ArtifactKind::Infrastructure,
            TemplateKey::Rollout(..) | TemplateKey::DeployScript(_) => ArtifactKind::DeployScript,
            TemplateKey::Compose => ArtifactKind::Compose,
            TemplateKey::Instructions => ArtifactKind::Instructions,
        }
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateKey::Container(app_type) => write!(f, "container[{}]", app_type),
            TemplateKey::Infrastructure(cloud, mode) => {
                write!(f, "infrastructure[{}/{}]", cloud, mode)
            }
            TemplateKey::Rollout(cloud, mode) => write!(f, "rollout[{}/{}]", cloud, mode),
            TemplateKey::DeployScript(cloud) => write!(f, "deploy-script[{}]", cloud),
            TemplateKey::Compose => write!(f, "compose"),
            TemplateKey::Instructions => write!(f, "instructions"),
        }
    }
}

/// How faithfully a template models its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "fidelity", rename_all = "snake_case")]
pub enum Fidelity {
    Full,
    BestEffort { note: &'static str },
}

impl Fidelity {
    pub fn note(&self) -> Option<&'static str> {
        match *self {
            Fidelity::Full => None,
            Fidelity::BestEffort { note } => Some(note),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateRecord {
    pub name: &'static str,
    pub source: &'static str,
    pub fidelity: Fidelity,
}

impl TemplateRecord {
    pub const fn full(name: &'static str, source: &'static str) -> Self {
        Self {
            name,
            source,
            fidelity: Fidelity::Full,
        }
    }

    pub const fn best_effort(name: &'static str, source: &'static str, note: &'static str) -> Self {
        Self {
            name,
            source,
            fidelity: Fidelity::BestEffort { note },
        }
    }
}

const DOCKER_FLASK: &str = include_str!("templates/docker_flask.j2");
const DOCKER_DJANGO: &str = include_str!("templates/docker_django.j2");
const DOCKER_NODE: &str = include_str!("templates/docker_node.j2");
const DOCKER_REACT: &str = include_str!("templates/docker_react.j2");
const DOCKER_GENERIC: &str = include_str!("templates/docker_generic.j2");

const TF_AWS_ECS: &str = include_str!("templates/tf_aws_ecs.j2");
const TF_AWS_LAMBDA: &str = include_str!("templates/tf_aws_lambda.j2");
const TF_AWS_EC2: &str = include_str!("templates/tf_aws_ec2.j2");
const TF_GCP_CLOUD_RUN: &str = include_str!("templates/tf_gcp_cloud_run.j2");
const TF_GCP_COMPUTE: &str = include_str!("templates/tf_gcp_compute.j2");
const TF_AZURE_CONTAINER: &str = include_str!("templates/tf_azure_container.j2");
const TF_AZURE_VM: &str = include_str!("templates/tf_azure_vm.j2");

const DEPLOY_AWS: &str = include_str!("templates/deploy_aws.j2");
const DEPLOY_GCP: &str = include_str!("templates/deploy_gcp.j2");
const DEPLOY_AZURE: &str = include_str!("templates/deploy_azure.j2");

const COMPOSE: &str = include_str!("templates/compose.j2");
const README: &str = include_str!("templates/readme.j2");

const GCP_CONTAINER_NOTE: &str =
    "GCP containers run on Cloud Run with default scaling; VPC networking is not modeled";
const GCP_SERVERLESS_NOTE: &str =
    "GCP serverless is deployed as a Cloud Run service rather than Cloud Functions";
const GCP_VM_NOTE: &str =
    "GCP VMs use a Container-Optimized OS startup script; registry credentials are not configured";
const AZURE_CONTAINER_NOTE: &str =
    "Azure containers run on Container Instances without autoscaling or a load balancer";
const AZURE_SERVERLESS_NOTE: &str =
    "Azure serverless is deployed as a Container Instances group rather than Azure Functions";
const AZURE_VM_NOTE: &str =
    "Azure VMs take the admin key from ~/.ssh/id_rsa.pub and do not authenticate to the registry";

/// The built-in selection table.
pub const STANDARD_TEMPLATES: &[(TemplateKey, TemplateRecord)] = &[
    (TemplateKey::Container(A::Flask), TemplateRecord::full("docker_flask", DOCKER_FLASK)),
    (TemplateKey::Container(A::Django), TemplateRecord::full("docker_django", DOCKER_DJANGO)),
    (TemplateKey::Container(A::NodeJs), TemplateRecord::full("docker_node", DOCKER_NODE)),
    (TemplateKey::Container(A::Express), TemplateRecord::full("docker_node", DOCKER_NODE)),
    (TemplateKey::Container(A::React), TemplateRecord::full("docker_react", DOCKER_REACT)),
    (TemplateKey::Container(A::Generic), TemplateRecord::full("docker_generic", DOCKER_GENERIC)),
    (
        TemplateKey::Infrastructure(C::Aws, M::Container),
        TemplateRecord::full("tf_aws_ecs", TF_AWS_ECS),
    ),
    (
        TemplateKey::Infrastructure(C::Aws, M::Serverless),
        TemplateRecord::full("tf_aws_lambda", TF_AWS_LAMBDA),
    ),
    (
        TemplateKey::Infrastructure(C::Aws, M::Vm),
        TemplateRecord::full("tf_aws_ec2", TF_AWS_EC2),
    ),
    (
        TemplateKey::Infrastructure(C::Gcp, M::Container),
        TemplateRecord::best_effort("tf_gcp_cloud_run", TF_GCP_CLOUD_RUN, GCP_CONTAINER_NOTE),
    ),
    (
        TemplateKey::Infrastructure(C::Gcp, M::Serverless),
        TemplateRecord::best_effort("tf_gcp_cloud_run", TF_GCP_CLOUD_RUN, GCP_SERVERLESS_NOTE),
    ),
    (
        TemplateKey::Infrastructure(C::Gcp, M::Vm),
        TemplateRecord::best_effort("tf_gcp_compute", TF_GCP_COMPUTE, GCP_VM_NOTE),
    ),
    (
        TemplateKey::Infrastructure(C::Azure, M::Container),
        TemplateRecord::best_effort(
            "tf_azure_container",
            TF_AZURE_CONTAINER,
            AZURE_CONTAINER_NOTE,
        ),
    ),
    (
        TemplateKey::Infrastructure(C::Azure, M::Serverless),
        TemplateRecord::best_effort(
            "tf_azure_container",
            TF_AZURE_CONTAINER,
            AZURE_SERVERLESS_NOTE,
        ),
    ),
    (
        TemplateKey::Infrastructure(C::Azure, M::Vm),
        TemplateRecord::best_effort("tf_azure_vm", TF_AZURE_VM, AZURE_VM_NOTE),
    ),
    (
        TemplateKey::Rollout(C::Aws, M::Container),
        TemplateRecord::full(
            "rollout_aws_ecs",
            "aws ecs update-service --cluster {{ name }}-cluster --service {{ name }} --force-new-deployment --region {{ region }}",
        ),
    ),
    (
        TemplateKey::Rollout(C::Aws, M::Serverless),
        TemplateRecord::full(
            "rollout_aws_lambda",
            "aws lambda update-function-code --function-name {{ name }} --image-uri \"$IMAGE_URI\" --region {{ region }}",
        ),
    ),
    (
        TemplateKey::Rollout(C::Aws, M::Vm),
        TemplateRecord::full(
            "rollout_aws_ec2",
            "terraform apply -auto-approve -input=false -replace=aws_instance.app -var=\"image_uri=$IMAGE_URI\"",
        ),
    ),
    (
        TemplateKey::Rollout(C::Gcp, M::Container),
        TemplateRecord::full(
            "rollout_gcp_run",
            "gcloud run deploy {{ name }} --image \"$IMAGE_URI\" --region {{ region }} --platform managed --port {{ port }}",
        ),
    ),
    (
        TemplateKey::Rollout(C::Gcp, M::Serverless),
        TemplateRecord::full(
            "rollout_gcp_run",
            "gcloud run deploy {{ name }} --image \"$IMAGE_URI\" --region {{ region }} --platform managed --port {{ port }}",
        ),
    ),
    (
        TemplateKey::Rollout(C::Gcp, M::Vm),
        TemplateRecord::full(
            "rollout_gcp_vm",
            "gcloud compute instances reset {{ name }}-vm --zone {{ region }}-a",
        ),
    ),
    (
        TemplateKey::Rollout(C::Azure, M::Container),
        TemplateRecord::full(
            "rollout_azure_aci",
            "az container restart --name {{ name }} --resource-group {{ name }}-rg",
        ),
    ),
    (
        TemplateKey::Rollout(C::Azure, M::Serverless),
        TemplateRecord::full(
            "rollout_azure_aci",
            "az container restart --name {{ name }} --resource-group {{ name }}-rg",
        ),
    ),
    (
        TemplateKey::Rollout(C::Azure, M::Vm),
        TemplateRecord::full(
            "rollout_azure_vm",
            "az vm restart --name {{ name }}-vm --resource-group {{ name }}-rg",
        ),
    ),
    (TemplateKey::DeployScript(C::Aws), TemplateRecord::full("deploy_aws", DEPLOY_AWS)),
    (TemplateKey::DeployScript(C::Gcp), TemplateRecord::full("deploy_gcp", DEPLOY_GCP)),
    (TemplateKey::DeployScript(C::Azure), TemplateRecord::full("deploy_azure", DEPLOY_AZURE)),
    (TemplateKey::Compose, TemplateRecord::full("compose", COMPOSE)),
    (TemplateKey::Instructions, TemplateRecord::full("readme", README)),
];

pub struct TemplateRegistry {
    records: BTreeMap<TemplateKey, TemplateRecord>,
    env: Environment<'static>,
}

impl TemplateRegistry {
    pub fn empty() -> Self {
        Self {
            records: BTreeMap::new(),
            env: template_environment(),
        }
    }

    pub fn standard() -> Result<Self, GenerateError> {
        Self::from_table(STANDARD_TEMPLATES)
    }

    pub fn from_table(table: &[(TemplateKey, TemplateRecord)]) -> Result<Self, GenerateError> {
        let mut registry = Self::empty();
        for (key, record) in table {
            registry.insert(*key, *record)?;
        }
        Ok(registry)
    }

    /// Registers `record` under `key`, rejecting block and comment syntax.
    pub fn insert(&mut self, key: TemplateKey, record: TemplateRecord) -> Result<(), GenerateError> {
        check_template_syntax(record.name, record.source)?;
        self.env
            .add_template(record.name, record.source)
            .map_err(|e| GenerateError::Render {
                template: record.name.to_string(),
                reason: e.to_string(),
            })?;
        self.records.insert(key, record);
        Ok(())
    }

    pub fn remove(&mut self, key: &TemplateKey) -> Option<TemplateRecord> {
        self.records.remove(key)
    }

    pub fn lookup(&self, key: &TemplateKey) -> Result<&TemplateRecord, GenerateError> {
        self.records
            .get(key)
            .ok_or_else(|| GenerateError::TemplateSelection {
                kind: key.kind(),
                key: key.to_string(),
            })
    }

    pub fn keys(&self) -> impl Iterator<Item = &TemplateKey> {
        self.records.keys()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn render<S: Serialize>(
        &self,
        record: &TemplateRecord,
        context: &S,
    ) -> Result<String, GenerateError> {
        let template = self
            .env
            .get_template(record.name)
            .map_err(|e| GenerateError::Render {
                template: record.name.to_string(),
                reason: e.to_string(),
            })?;
        template.render(context).map_err(|e| GenerateError::Render {
            template: record.name.to_string(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("keys", &self.records.keys().collect::<Vec<_>>())
            .finish()
    }
}
