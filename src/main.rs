use autodeploy::cli::commands::{CliArgs, Commands};
use autodeploy::cli::handlers::{handle_generate, handle_inspect, handle_parse, EXIT_FAILURE};
use autodeploy::util::logging::{init_logging, parse_level, LoggingConfig};
use autodeploy::{AutodeployConfig, VERSION};

use clap::Parser;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();

    let config = match AutodeployConfig::from_env().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_FAILURE);
        }
    };

    init_logging(LoggingConfig::with_level(log_level(&args, &config)));

    debug!("autodeploy v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Generate(generate_args) => handle_generate(generate_args, &config),
        Commands::Inspect(inspect_args) => handle_inspect(inspect_args, &config),
        Commands::Parse(parse_args) => handle_parse(parse_args),
    };

    std::process::exit(exit_code);
}

fn log_level(args: &CliArgs, config: &AutodeployConfig) -> Level {
    if let Some(level_str) = &args.log_level {
        return parse_level(level_str).unwrap_or_else(|| {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        });
    }
    if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&config.log_level).unwrap_or(Level::INFO)
    }
}
