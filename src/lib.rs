//! autodeploy - deployment bundles from a plain-language request
//!
//! A request such as "Deploy my Flask app on AWS using containers" is turned
//! into five files: a `Dockerfile`, a Terraform `main.tf`, a `deploy.sh`, a
//! `docker-compose.yml` and a `README.md`. When a repository is supplied its
//! manifests and entry points refine the request before rendering.
//!
//! # Pipeline
//!
//! 1. [`intent`]: keyword tables turn the text into a base [`AppConfig`].
//! 2. [`fetch`] + [`inspect`]: the repository is resolved to a local tree and
//!    scanned into [`Evidence`].
//! 3. [`merge`]: evidence refines the base configuration.
//! 4. [`generate`]: templates are selected by table lookup and rendered.
//!
//! A repository that cannot be fetched or read degrades the run instead of
//! failing it.
//!
//! # Example
//!
//! ```
//! use autodeploy::generate::{ArtifactGenerator, GeneratorSettings};
//! use autodeploy::pipeline::{DeploymentRequest, Pipeline};
//!
//! let generator = ArtifactGenerator::new(GeneratorSettings::default()).unwrap();
//! let outcome = Pipeline::new(generator)
//!     .run(&DeploymentRequest::new("Deploy my Flask app on AWS using containers"))
//!     .unwrap();
//!
//! assert_eq!(outcome.config().port, 5000);
//! assert!(outcome.bundle.content("Dockerfile").unwrap().contains("EXPOSE 5000"));
//! ```

pub mod app_config;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod generate;
pub mod inspect;
pub mod intent;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stack;
pub mod util;

pub use app_config::{AppConfig, ConfigInvariantError};
pub use config::{AutodeployConfig, ConfigError};
pub use fetch::{FetchError, HttpArchiveFetcher, RepositoryFetcher, RepositoryLocator};
pub use generate::{ArtifactBundle, ArtifactGenerator, GenerateError, GeneratorSettings};
pub use inspect::{Evidence, InspectError, RepositoryInspector};
pub use intent::{InputError, IntentExtractor};
pub use merge::ConfigurationMerger;
pub use pipeline::{DeploymentRequest, Pipeline, PipelineError, PipelineOutcome, RunStatus};
pub use stack::{AppType, CloudProvider, DeploymentMode};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
