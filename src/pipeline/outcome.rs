use crate::app_config::{AppConfig, ConfigInvariantError};
use crate::generate::{ArtifactBundle, GenerateError};
use crate::inspect::Evidence;
use crate::intent::InputError;
use serde::Serialize;
use thiserror::Error;

/// What the caller asked for: free text plus an optional repository locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub text: String,
    pub repository: Option<String>,
}

impl DeploymentRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            repository: None,
        }
    }

    pub fn with_repository(mut self, locator: impl Into<String>) -> Self {
        self.repository = Some(locator.into());
        self
    }
}

/// Whether the bundle was built with everything the caller supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    Complete,
    /// The repository could not be analyzed; the bundle uses intent only.
    Degraded { reason: String },
}

impl RunStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, RunStatus::Degraded { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Complete => "complete",
            RunStatus::Degraded { .. } => "degraded",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    /// Configuration as extracted from the text, before any evidence.
    pub intent: AppConfig,
    pub evidence: Option<Evidence>,
    pub bundle: ArtifactBundle,
    #[serde(flatten)]
    pub status: RunStatus,
}

impl PipelineOutcome {
    /// The merged configuration the bundle was rendered from.
    pub fn config(&self) -> &AppConfig {
        &self.bundle.config
    }

    pub fn is_degraded(&self) -> bool {
        self.status.is_degraded()
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    Input(#[from] InputError),

    #[error("Merged configuration is invalid: {0}")]
    InvalidConfig(#[from] ConfigInvariantError),

    #[error("Artifact generation failed: {0}")]
    Generate(#[from] GenerateError),
}
