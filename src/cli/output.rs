//! Output formatting for multiple formats
//!
//! JSON and YAML are built from the same `serde_json::Value` so both carry
//! identical fields; the human format is a short boxed summary.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::path::Path;

use crate::app_config::AppConfig;
use crate::inspect::Evidence;
use crate::pipeline::{PipelineOutcome, RunStatus};

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a pipeline run. `written_to` is the bundle directory, or
    /// `None` for a dry run.
    pub fn format_outcome(&self, outcome: &PipelineOutcome, written_to: Option<&Path>) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&outcome_value(outcome, written_to))
                .context("Failed to serialize outcome to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&outcome_value(outcome, written_to))
                .context("Failed to serialize outcome to YAML"),
            OutputFormat::Human => Ok(self.format_outcome_human(outcome, written_to)),
        }
    }

    pub fn format_evidence(&self, evidence: &Evidence) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(evidence).context("Failed to serialize evidence to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(evidence).context("Failed to serialize evidence to YAML")
            }
            OutputFormat::Human => Ok(self.format_evidence_human(evidence)),
        }
    }

    pub fn format_config(&self, config: &AppConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(config).context("Failed to serialize config to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(config).context("Failed to serialize config to YAML")
            }
            OutputFormat::Human => {
                let mut output = String::new();
                output.push_str("Deployment Intent\n");
                output.push_str(RULE);
                output.push_str("\n\n");
                push_config(&mut output, config);
                Ok(output)
            }
        }
    }

    fn format_outcome_human(&self, outcome: &PipelineOutcome, written_to: Option<&Path>) -> String {
        let mut output = String::new();
        let config = outcome.config();

        match &outcome.status {
            RunStatus::Complete => output.push_str("\u{2713} Deployment Bundle\n"),
            RunStatus::Degraded { .. } => {
                output.push_str("\u{26A0} Deployment Bundle (repository not analyzed)\n")
            }
        }
        output.push_str(RULE);
        output.push_str("\n\n");

        push_config(&mut output, config);

        if let Some(evidence) = &outcome.evidence {
            output.push_str(&format!("Evidence:      {}\n", evidence.summary()));
        }
        output.push('\n');

        output.push_str("Files:\n");
        let filenames = outcome.bundle.filenames();
        for (i, filename) in filenames.iter().enumerate() {
            let connector = if i + 1 == filenames.len() {
                "\u{2514}"
            } else {
                "\u{251C}"
            };
            output.push_str(&format!("{}\u{2500} {}\n", connector, filename));
        }
        output.push('\n');

        match written_to {
            Some(dir) => output.push_str(&format!("Written to: {}\n", dir.display())),
            None => output.push_str(&format!(
                "Dry run: would write {}/\n",
                outcome.bundle.output_dir_name()
            )),
        }

        if let RunStatus::Degraded { reason } = &outcome.status {
            output.push_str(&format!(
                "\n\u{26A0} Repository analysis skipped: {}\n",
                reason
            ));
        }

        if !outcome.bundle.limitations.is_empty() {
            output.push_str("\n\u{26A0} Known limitations:\n");
            for limitation in &outcome.bundle.limitations {
                output.push_str(&format!("  - {}\n", limitation));
            }
        }

        output
    }

    fn format_evidence_human(&self, evidence: &Evidence) -> String {
        let mut output = String::new();
        output.push_str("Repository Evidence\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        let framework = evidence
            .framework
            .map(|f| f.name().to_string())
            .unwrap_or_else(|| "(none detected)".to_string());
        output.push_str(&format!("Framework:     {}\n", framework));

        match (&evidence.port, &evidence.port_source) {
            (Some(port), Some(source)) => {
                output.push_str(&format!("Port:          {} ({})\n", port, source))
            }
            (Some(port), None) => output.push_str(&format!("Port:          {}\n", port)),
            _ => output.push_str("Port:          (none detected)\n"),
        }

        if evidence.manifests.is_empty() {
            output.push_str("Manifests:     (none found)\n");
        } else {
            output.push_str(&format!("Manifests:     {}\n", evidence.manifests.join(", ")));
        }

        if evidence.dependencies.is_empty() {
            output.push_str("Dependencies:  (none)\n");
        } else {
            output.push_str(&format!("Dependencies:  {}\n", evidence.dependencies.join(", ")));
        }
        output.push_str(&format!("Files scanned: {}\n", evidence.files_scanned));

        if !evidence.notes.is_empty() {
            output.push_str("\n\u{26A0} Notes:\n");
            for note in &evidence.notes {
                output.push_str(&format!("  - {}\n", note));
            }
        }

        output
    }
}

fn push_config(output: &mut String, config: &AppConfig) {
    output.push_str(&format!("Name:          {}\n", config.name));
    output.push_str(&format!("App Type:      {}\n", config.app_type.name()));
    output.push_str(&format!("Cloud:         {}\n", config.cloud_provider.name()));
    output.push_str(&format!("Mode:          {}\n", config.deployment_mode.name()));
    output.push_str(&format!("Port:          {}\n", config.port));
    if config.dependencies.is_empty() {
        output.push_str("Dependencies:  (none)\n");
    } else {
        let deps: Vec<&str> = config.dependencies.iter().map(String::as_str).collect();
        output.push_str(&format!("Dependencies:  {}\n", deps.join(", ")));
    }
}

fn outcome_value(outcome: &PipelineOutcome, written_to: Option<&Path>) -> Value {
    let mut value = json!({
        "status": outcome.status.as_str(),
        "config": outcome.config(),
        "intent": outcome.intent,
        "evidence": outcome.evidence,
        "output_dir": written_to.map(|dir| dir.display().to_string()),
        "files": outcome.bundle.filenames(),
        "limitations": outcome.bundle.limitations,
        "artifacts": outcome.bundle.iter().collect::<Vec<_>>(),
    });
    if let RunStatus::Degraded { reason } = &outcome.status {
        value["reason"] = Value::String(reason.clone());
    }
    value
}
