//! Natural-language intent extraction
//!
//! Turns a free-text deployment request into a first `AppConfig` guess. This
//! is a deterministic rule table, not a language model: the request is scanned
//! against the ordered keyword tables in [`rules`], and anything that matches
//! nothing falls back to the generic defaults. Extraction never fails.
//!
//! # Example
//!
//! ```
//! use autodeploy::intent::IntentExtractor;
//! use autodeploy::stack::{AppType, CloudProvider, DeploymentMode};
//!
//! let config = IntentExtractor::standard().parse("Deploy my Flask app on AWS using containers");
//! assert_eq!(config.app_type, AppType::Flask);
//! assert_eq!(config.cloud_provider, CloudProvider::Aws);
//! assert_eq!(config.deployment_mode, DeploymentMode::Container);
//! assert_eq!(config.port, 5000);
//! ```

pub mod name;
pub mod rules;

pub use rules::{first_match, IntentRules, KeywordRule};

use crate::app_config::{derived_name, AppConfig};
use crate::stack::{AppType, CloudProvider, DeploymentMode};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

/// Longest request accepted by [`validate_request`].
pub const MAX_REQUEST_LEN: usize = 4096;

/// The request text is unusable; callers should ask again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Deployment description is empty")]
    Empty,

    #[error("Deployment description is too long ({len} characters, maximum {max})")]
    TooLong { len: usize, max: usize },
}

/// Trims the request and rejects empty or oversized input.
pub fn validate_request(text: &str) -> Result<&str, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }
    let len = trimmed.chars().count();
    if len > MAX_REQUEST_LEN {
        return Err(InputError::TooLong {
            len,
            max: MAX_REQUEST_LEN,
        });
    }
    Ok(trimmed)
}

#[derive(Debug, Clone, Copy)]
pub struct IntentExtractor<'r> {
    rules: &'r IntentRules,
}

impl IntentExtractor<'static> {
    pub fn standard() -> Self {
        Self::new(IntentRules::standard())
    }
}

impl<'r> IntentExtractor<'r> {
    pub fn new(rules: &'r IntentRules) -> Self {
        Self { rules }
    }

    /// Builds the intent-only configuration for `text`.
    ///
    /// The port is assigned from the default-port table after the app type
    /// is known, so the result is deployable even without repository evidence.
    pub fn parse(&self, text: &str) -> AppConfig {
        let app_type = first_match(&self.rules.app_types, text).unwrap_or(AppType::Generic);
        let cloud_provider =
            first_match(&self.rules.cloud_providers, text).unwrap_or(CloudProvider::default());
        let deployment_mode =
            first_match(&self.rules.deployment_modes, text).unwrap_or(DeploymentMode::default());

        let explicit_name = name::extract_name(text, self.rules);
        let name = explicit_name
            .clone()
            .unwrap_or_else(|| derived_name(app_type));

        debug!(
            app_type = %app_type,
            cloud = %cloud_provider,
            mode = %deployment_mode,
            name = %name,
            explicit_name = explicit_name.is_some(),
            "Extracted deployment intent"
        );

        AppConfig {
            name,
            app_type,
            cloud_provider,
            deployment_mode,
            port: app_type.default_port(),
            dependencies: BTreeSet::new(),
        }
    }
}

impl Default for IntentExtractor<'static> {
    fn default() -> Self {
        Self::standard()
    }
}
