//! Combines intent and repository evidence into the final `AppConfig`.
//!
//! Precedence, most specific first:
//! 1. A detected framework replaces the app type only when it refines it
//!    (`generic` by anything, `nodejs` by `express`/`react`). An explicit
//!    framework from the request is never overridden.
//! 2. A detected port always wins. When the app type was refined and no port
//!    was detected, a port that was still the old type's default moves to the
//!    new type's default.
//! 3. Detected dependencies populate the dependency set.
//! 4. Cloud provider, deployment mode and name are intent-only.

use crate::app_config::AppConfig;
use crate::inspect::Evidence;
use tracing::{debug, info};

#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigurationMerger;

impl ConfigurationMerger {
    pub fn new() -> Self {
        Self
    }

    pub fn merge(&self, base: AppConfig, evidence: &Evidence) -> AppConfig {
        let mut merged = base;

        if let Some(detected) = evidence.framework {
            if merged.app_type.is_refined_by(detected) {
                let had_default_port = merged.port == merged.app_type.default_port();
                debug!(from = %merged.app_type, to = %detected, "Refining app type from evidence");
                merged.app_type = detected;
                if had_default_port {
                    merged.port = detected.default_port();
                }
            } else if merged.app_type != detected {
                info!(
                    requested = %merged.app_type,
                    detected = %detected,
                    "Keeping requested app type over repository evidence"
                );
            }
        }

        if let Some(port) = evidence.port {
            if port != merged.port {
                debug!(from = merged.port, to = port, "Using detected port");
            }
            merged.port = port;
        }

        if !evidence.dependencies.is_empty() {
            merged.dependencies = evidence.dependencies.iter().cloned().collect();
        }

        merged
    }
}
