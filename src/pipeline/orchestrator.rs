use super::outcome::{DeploymentRequest, PipelineError, PipelineOutcome, RunStatus};
use crate::fetch::{FetchedRepository, RepositoryFetcher, RepositoryLocator};
use crate::generate::ArtifactGenerator;
use crate::inspect::{Evidence, RepositoryInspector};
use crate::intent::{validate_request, IntentExtractor};
use crate::merge::ConfigurationMerger;
use crate::progress::{ProgressEvent, ProgressHandler};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs intent extraction, repository analysis, merge and generation in order.
///
/// Without a fetcher only local directory locators can be analyzed; any
/// remote locator then degrades to an intent-only run.
pub struct Pipeline {
    extractor: IntentExtractor<'static>,
    fetcher: Option<Box<dyn RepositoryFetcher>>,
    inspector: RepositoryInspector,
    merger: ConfigurationMerger,
    generator: ArtifactGenerator,
    progress_handler: Option<Box<dyn ProgressHandler>>,
}

impl Pipeline {
    pub fn new(generator: ArtifactGenerator) -> Self {
        Self {
            extractor: IntentExtractor::standard(),
            fetcher: None,
            inspector: RepositoryInspector::new(),
            merger: ConfigurationMerger::new(),
            generator,
            progress_handler: None,
        }
    }

    pub fn with_fetcher(mut self, fetcher: Box<dyn RepositoryFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn with_inspector(mut self, inspector: RepositoryInspector) -> Self {
        self.inspector = inspector;
        self
    }

    pub fn with_progress(mut self, handler: Box<dyn ProgressHandler>) -> Self {
        self.progress_handler = Some(handler);
        self
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(handler) = &self.progress_handler {
            handler.on_progress(&event);
        }
    }

    pub fn run(&self, request: &DeploymentRequest) -> Result<PipelineOutcome, PipelineError> {
        let start = Instant::now();
        let text = validate_request(&request.text)?;

        self.emit(ProgressEvent::Started {
            request_len: text.len(),
            has_repository: request.repository.is_some(),
        });

        let intent = self.extractor.parse(text);
        self.emit(ProgressEvent::IntentExtracted {
            app_type: intent.app_type.to_string(),
            cloud_provider: intent.cloud_provider.to_string(),
            deployment_mode: intent.deployment_mode.to_string(),
        });

        let (evidence, status) = match request.repository.as_deref() {
            None => (None, RunStatus::Complete),
            Some(locator) => match self.analyze(locator) {
                Ok(evidence) => (Some(evidence), RunStatus::Complete),
                Err(reason) => {
                    self.emit(ProgressEvent::RepositoryUnavailable {
                        locator: locator.to_string(),
                        reason: reason.clone(),
                    });
                    (None, RunStatus::Degraded { reason })
                }
            },
        };

        let config = match &evidence {
            Some(evidence) => self.merger.merge(intent.clone(), evidence),
            None => intent.clone(),
        };
        config.validate()?;
        self.emit(ProgressEvent::ConfigMerged {
            app_type: config.app_type.to_string(),
            port: config.port,
            refined: config != intent,
        });
        debug!(config = %config, "Configuration ready for generation");

        let bundle = self.generator.generate(&config)?;
        self.emit(ProgressEvent::ArtifactsGenerated {
            artifacts: bundle.len(),
            limitations: bundle.limitations.len(),
        });

        self.emit(ProgressEvent::Completed {
            degraded: status.is_degraded(),
            total_time: start.elapsed(),
        });
        info!(
            name = %config.name,
            status = status.as_str(),
            elapsed_ms = start.elapsed().as_millis(),
            "Pipeline finished"
        );

        Ok(PipelineOutcome {
            intent,
            evidence,
            bundle,
            status,
        })
    }

    /// Fetches and inspects the repository. Any failure is returned as the
    /// reason for a degraded run.
    fn analyze(&self, locator: &str) -> Result<Evidence, String> {
        let fetch_start = Instant::now();
        let locator = RepositoryLocator::parse(locator).map_err(|e| e.to_string())?;

        let repository = match (&self.fetcher, &locator) {
            (Some(fetcher), _) => fetcher.fetch(&locator).map_err(|e| e.to_string())?,
            (None, RepositoryLocator::LocalPath(path)) => FetchedRepository::local(path.clone()),
            (None, remote) => {
                warn!(locator = %remote, "No fetcher configured for remote repository");
                return Err(format!("cannot fetch {remote}: remote fetching is disabled"));
            }
        };
        self.emit(ProgressEvent::RepositoryFetched {
            source: repository.source().to_string(),
            fetch_time: fetch_start.elapsed(),
        });

        let evidence = self
            .inspector
            .inspect(repository.root())
            .map_err(|e| e.to_string())?;
        self.emit(ProgressEvent::InspectionComplete {
            files_scanned: evidence.files_scanned,
            framework: evidence.framework.map(|f| f.to_string()),
            port: evidence.port,
            dependencies: evidence.dependencies.len(),
        });
        Ok(evidence)
    }
}
