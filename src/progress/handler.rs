//! Progress handler trait and events

use std::time::Duration;

/// Events emitted as a request moves through the pipeline
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Pipeline started
    Started {
        request_len: usize,
        has_repository: bool,
    },

    /// Intent extraction produced the base configuration
    IntentExtracted {
        app_type: String,
        cloud_provider: String,
        deployment_mode: String,
    },

    /// Repository fetched (or resolved locally)
    RepositoryFetched {
        source: String,
        fetch_time: Duration,
    },

    /// Repository could not be fetched or read; continuing from intent only
    RepositoryUnavailable { locator: String, reason: String },

    /// Repository inspection completed
    InspectionComplete {
        files_scanned: usize,
        framework: Option<String>,
        port: Option<u16>,
        dependencies: usize,
    },

    /// Intent and evidence merged
    ConfigMerged {
        app_type: String,
        port: u16,
        refined: bool,
    },

    /// Artifacts rendered
    ArtifactsGenerated {
        artifacts: usize,
        limitations: usize,
    },

    /// Pipeline completed
    Completed { degraded: bool, total_time: Duration },
}

/// Trait for handling progress events during a pipeline run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
