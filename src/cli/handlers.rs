use super::commands::{GenerateArgs, InspectArgs, ParseArgs};
use super::output::OutputFormatter;
use crate::config::AutodeployConfig;
use crate::fetch::HttpArchiveFetcher;
use crate::generate::ArtifactGenerator;
use crate::inspect::RepositoryInspector;
use crate::intent::{validate_request, IntentExtractor};
use crate::output::BundleWriter;
use crate::pipeline::{DeploymentRequest, Pipeline, RunStatus};
use crate::progress::LoggingHandler;
use anyhow::{Context, Result};
use tracing::{debug, error};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_WRITE_FAILURE: i32 = 2;

pub fn build_pipeline(config: &AutodeployConfig) -> Result<Pipeline> {
    let generator = ArtifactGenerator::new(config.generator_settings())
        .context("Failed to load deployment templates")?;
    let fetcher =
        HttpArchiveFetcher::new(config.fetch_config()).context("Failed to create HTTP client")?;

    Ok(Pipeline::new(generator)
        .with_fetcher(Box::new(fetcher))
        .with_inspector(RepositoryInspector::with_config(config.scan_config()))
        .with_progress(Box::new(LoggingHandler)))
}

fn print(output: Result<String>) -> i32 {
    match output {
        Ok(text) => {
            println!("{}", text.trim_end());
            EXIT_SUCCESS
        }
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}

pub fn handle_generate(args: &GenerateArgs, config: &AutodeployConfig) -> i32 {
    let pipeline = match build_pipeline(config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            return EXIT_FAILURE;
        }
    };

    let mut request = DeploymentRequest::new(args.description());
    if let Some(repo) = &args.repo {
        request = request.with_repository(repo.clone());
    }
    debug!(?request, "Running pipeline");

    let outcome = match pipeline.run(&request) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Pipeline failed: {}", e);
            eprintln!("Error: {}", e);
            return EXIT_FAILURE;
        }
    };

    if let RunStatus::Degraded { reason } = &outcome.status {
        eprintln!(
            "Warning: repository analysis skipped ({}); bundle generated from the description only",
            reason
        );
    }

    let written_to = if args.dry_run {
        None
    } else {
        let root = args
            .output_dir
            .clone()
            .unwrap_or_else(|| config.output_root.clone());
        match BundleWriter::new().write(&outcome.bundle, &root) {
            Ok(dir) => Some(dir),
            Err(e) => {
                error!("Failed to write bundle: {:#}", e);
                eprintln!("Error: {:#}", e);
                return EXIT_WRITE_FAILURE;
            }
        }
    };

    let formatter = OutputFormatter::new(args.format.into());
    print(formatter.format_outcome(&outcome, written_to.as_deref()))
}

pub fn handle_inspect(args: &InspectArgs, config: &AutodeployConfig) -> i32 {
    let inspector = RepositoryInspector::with_config(config.scan_config());
    match inspector.inspect(&args.path) {
        Ok(evidence) => print(OutputFormatter::new(args.format.into()).format_evidence(&evidence)),
        Err(e) => {
            error!("Inspection failed: {}", e);
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

pub fn handle_parse(args: &ParseArgs) -> i32 {
    let description = args.description();
    let text = match validate_request(&description) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_FAILURE;
        }
    };

    let config = IntentExtractor::standard().parse(text);
    print(OutputFormatter::new(args.format.into()).format_config(&config))
}
