//! End-to-end deployment pipeline
//!
//! A repository that cannot be fetched or read never fails the run: the
//! outcome is marked [`RunStatus::Degraded`] and the bundle is generated from
//! the intent alone.

pub mod orchestrator;
pub mod outcome;

pub use orchestrator::Pipeline;
pub use outcome::{DeploymentRequest, PipelineError, PipelineOutcome, RunStatus};
