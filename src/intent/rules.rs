//! Ordered keyword tables for intent extraction.
//!
//! Each table is scanned top to bottom and the first rule whose keyword
//! appears in the request wins. The order is part of the contract: "django"
//! is checked before "flask", "serverless" before "container", and so on.
//! Keywords match case-insensitively on word boundaries, so "Node.js",
//! "NODE" and "node-based" all hit the `node` keyword.

use crate::stack::{AppType, CloudProvider, DeploymentMode};
use regex::Regex;
use std::sync::OnceLock;

pub const APP_TYPE_KEYWORDS: &[(AppType, &[&str])] = &[
    (AppType::Django, &["django"]),
    (AppType::Flask, &["flask"]),
    (AppType::NodeJs, &["node", "nodejs", "node.js", "javascript"]),
    (AppType::Express, &["express", "expressjs", "express.js"]),
    (AppType::React, &["react", "reactjs", "react.js"]),
];

pub const CLOUD_PROVIDER_KEYWORDS: &[(CloudProvider, &[&str])] = &[
    (CloudProvider::Aws, &["aws", "amazon"]),
    (CloudProvider::Gcp, &["gcp", "google"]),
    (CloudProvider::Azure, &["azure", "microsoft"]),
];

pub const DEPLOYMENT_MODE_KEYWORDS: &[(DeploymentMode, &[&str])] = &[
    (
        DeploymentMode::Serverless,
        &["serverless", "lambda", "lambdas", "faas"],
    ),
    (
        DeploymentMode::Container,
        &["container", "containers", "containerized", "docker", "fargate"],
    ),
    (
        DeploymentMode::Vm,
        &["vm", "vms", "ec2", "virtual machine", "virtual machines"],
    ),
];

/// One row of a keyword table.
#[derive(Debug, Clone)]
pub struct KeywordRule<T> {
    pub value: T,
    pub keywords: &'static [&'static str],
    pattern: Regex,
}

impl<T: Copy> KeywordRule<T> {
    pub fn new(value: T, keywords: &'static [&'static str]) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = keywords.iter().map(|k| regex::escape(k)).collect();
        let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|")))?;
        Ok(Self {
            value,
            keywords,
            pattern,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// First-match-wins scan over an ordered rule list.
pub fn first_match<T: Copy>(rules: &[KeywordRule<T>], text: &str) -> Option<T> {
    rules.iter().find(|rule| rule.is_match(text)).map(|rule| rule.value)
}

fn build_table<T: Copy>(
    table: &'static [(T, &'static [&'static str])],
) -> Result<Vec<KeywordRule<T>>, regex::Error> {
    table
        .iter()
        .map(|(value, keywords)| KeywordRule::new(*value, *keywords))
        .collect()
}

/// Compiled keyword tables, built once per process.
#[derive(Debug, Clone)]
pub struct IntentRules {
    pub app_types: Vec<KeywordRule<AppType>>,
    pub cloud_providers: Vec<KeywordRule<CloudProvider>>,
    pub deployment_modes: Vec<KeywordRule<DeploymentMode>>,
}

static STANDARD_RULES: OnceLock<IntentRules> = OnceLock::new();

impl IntentRules {
    pub fn from_tables(
        app_types: &'static [(AppType, &'static [&'static str])],
        cloud_providers: &'static [(CloudProvider, &'static [&'static str])],
        deployment_modes: &'static [(DeploymentMode, &'static [&'static str])],
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            app_types: build_table(app_types)?,
            cloud_providers: build_table(cloud_providers)?,
            deployment_modes: build_table(deployment_modes)?,
        })
    }

    /// The built-in tables. Keywords are escaped before compilation, so the
    /// patterns cannot fail to build.
    pub fn standard() -> &'static IntentRules {
        STANDARD_RULES.get_or_init(|| {
            Self::from_tables(
                APP_TYPE_KEYWORDS,
                CLOUD_PROVIDER_KEYWORDS,
                DEPLOYMENT_MODE_KEYWORDS,
            )
            .expect("escaped keyword patterns always compile")
        })
    }

    /// True when `token` is one of the framework/provider/mode keywords.
    pub fn is_keyword(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        let in_table = |keywords: &[&str]| keywords.iter().any(|k| *k == token);

        self.app_types.iter().any(|r| in_table(r.keywords))
            || self.cloud_providers.iter().any(|r| in_table(r.keywords))
            || self.deployment_modes.iter().any(|r| in_table(r.keywords))
    }
}
