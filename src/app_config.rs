//! The authoritative description of what to deploy.
//!
//! An `AppConfig` is created by intent extraction, refined by the merger and
//! read by the generator. Its enumerated fields are closed types, so the only
//! invariants that need checking at runtime are the port range and the
//! filesystem safety of the name.

use crate::stack::{AppType, CloudProvider, DeploymentMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Name used when nothing better can be derived.
pub const DEFAULT_APP_NAME: &str = "myapp";

/// Longest name accepted; keeps derived resource names within cloud limits.
pub const MAX_NAME_LEN: usize = 40;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigInvariantError {
    #[error("Port {0} is outside the valid TCP range 1-65535")]
    PortOutOfRange(u32),

    #[error("Application name '{0}' is not filesystem-safe")]
    UnsafeName(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub app_type: AppType,
    pub cloud_provider: CloudProvider,
    pub deployment_mode: DeploymentMode,
    pub port: u16,
    pub dependencies: BTreeSet<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_app_type(AppType::Generic)
    }
}

impl AppConfig {
    /// Configuration for `app_type` with its default port and derived name.
    pub fn for_app_type(app_type: AppType) -> Self {
        Self {
            name: derived_name(app_type),
            app_type,
            cloud_provider: CloudProvider::default(),
            deployment_mode: DeploymentMode::default(),
            port: app_type.default_port(),
            dependencies: BTreeSet::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigInvariantError> {
        if self.port == 0 {
            return Err(ConfigInvariantError::PortOutOfRange(0));
        }
        if !is_safe_name(&self.name) {
            return Err(ConfigInvariantError::UnsafeName(self.name.clone()));
        }
        Ok(())
    }

    /// Directory the bundle is written to, relative to the output root.
    pub fn output_dir_name(&self) -> String {
        format!("deployment_{}", self.name)
    }
}

impl fmt::Display for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, port {}, {} on {})",
            self.name, self.app_type, self.port, self.deployment_mode, self.cloud_provider
        )
    }
}

/// Name derived from the application type when the request names nothing.
pub fn derived_name(app_type: AppType) -> String {
    match app_type {
        AppType::Generic => DEFAULT_APP_NAME.to_string(),
        other => format!("{}-app", other.as_str()),
    }
}

/// Lowercases and replaces anything outside `[a-z0-9-]` so the result can be
/// used as a directory name and as a cloud resource name.
pub fn sanitize_name(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut last_dash = true;

    for c in raw.trim().chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }

    let mut name = out.trim_end_matches('-').to_string();
    if name.len() > MAX_NAME_LEN {
        name.truncate(MAX_NAME_LEN);
        name = name.trim_end_matches('-').to_string();
    }

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
