use super::{GenerateError, GeneratorSettings};
use crate::app_config::AppConfig;
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

/// Strict environment: an undefined variable is an error, not an empty string.
pub fn template_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env
}

/// Only `{{ ... }}` interpolation is allowed in templates.
pub fn disallowed_template_token(template: &str) -> Option<&'static str> {
    if template.contains("{%") {
        return Some("{%");
    }
    if template.contains("{#") {
        return Some("{#");
    }
    None
}

pub fn check_template_syntax(name: &str, source: &str) -> Result<(), GenerateError> {
    match disallowed_template_token(source) {
        Some(token) => Err(GenerateError::TemplateSyntax {
            template: name.to_string(),
            token: token.to_string(),
        }),
        None => Ok(()),
    }
}

/// Variables available to every template. All values are precomputed so the
/// templates need no logic.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    pub name: String,
    pub title: String,
    pub app_type: String,
    pub app_type_name: String,
    pub cloud_provider: String,
    pub cloud_name: String,
    pub deployment_mode: String,
    pub mode_name: String,
    pub port: u16,
    pub cpu: u32,
    pub memory: u32,
    pub region: String,
    pub image: String,
    pub dependencies: String,
    pub rollout_command: String,
    pub limitations: String,
}

impl RenderContext {
    pub fn new(config: &AppConfig, settings: &GeneratorSettings) -> Self {
        let dependencies = if config.dependencies.is_empty() {
            "none detected".to_string()
        } else {
            config
                .dependencies
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };

        Self {
            name: config.name.clone(),
            title: title_case(&config.name),
            app_type: config.app_type.as_str().to_string(),
            app_type_name: config.app_type.name().to_string(),
            cloud_provider: config.cloud_provider.as_str().to_string(),
            cloud_name: config.cloud_provider.name().to_string(),
            deployment_mode: config.deployment_mode.as_str().to_string(),
            mode_name: config.deployment_mode.name().to_string(),
            port: config.port,
            cpu: settings.cpu,
            memory: settings.memory,
            region: settings.region(config.cloud_provider).to_string(),
            image: format!("{}:latest", config.name),
            dependencies,
            rollout_command: String::new(),
            limitations: String::new(),
        }
    }
}

/// "billing-service" becomes "Billing Service".
pub fn title_case(name: &str) -> String {
    name.split('-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Markdown bullet list, or a single "None" bullet.
pub fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "- None for this configuration.".to_string();
    }
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}
