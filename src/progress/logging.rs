//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started {
                request_len,
                has_repository,
            } => {
                info!(request_len, has_repository, "Starting deployment pipeline");
            }
            ProgressEvent::IntentExtracted {
                app_type,
                cloud_provider,
                deployment_mode,
            } => {
                info!(
                    app_type = %app_type,
                    cloud = %cloud_provider,
                    mode = %deployment_mode,
                    "Intent extracted"
                );
            }
            ProgressEvent::RepositoryFetched { source, fetch_time } => {
                info!(
                    source = %source,
                    fetch_time_ms = fetch_time.as_millis(),
                    "Repository ready"
                );
            }
            ProgressEvent::RepositoryUnavailable { locator, reason } => {
                warn!(
                    locator = %locator,
                    reason = %reason,
                    "Repository unavailable, continuing with intent only"
                );
            }
            ProgressEvent::InspectionComplete {
                files_scanned,
                framework,
                port,
                dependencies,
            } => {
                info!(
                    files_scanned,
                    framework = framework.as_deref().unwrap_or("none"),
                    port = ?port,
                    dependencies,
                    "Repository inspection complete"
                );
            }
            ProgressEvent::ConfigMerged {
                app_type,
                port,
                refined,
            } => {
                if *refined {
                    info!(app_type = %app_type, port, "Configuration refined by repository evidence");
                } else {
                    debug!(app_type = %app_type, port, "Configuration unchanged by merge");
                }
            }
            ProgressEvent::ArtifactsGenerated {
                artifacts,
                limitations,
            } => {
                if *limitations > 0 {
                    warn!(artifacts, limitations, "Artifacts generated with known limitations");
                } else {
                    info!(artifacts, "Artifacts generated");
                }
            }
            ProgressEvent::Completed {
                degraded,
                total_time,
            } => {
                if *degraded {
                    warn!(
                        total_time_ms = total_time.as_millis(),
                        "Pipeline complete (degraded)"
                    );
                } else {
                    info!(total_time_ms = total_time.as_millis(), "Pipeline complete");
                }
            }
        }
    }
}
