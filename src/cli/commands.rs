use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Generate deployment bundles from a plain-language request
#[derive(Parser, Debug)]
#[command(
    name = "autodeploy",
    about = "Generate deployment bundles from a plain-language request",
    version,
    author,
    long_about = "autodeploy reads a short description such as \"deploy my flask app to aws \
                  serverless\", optionally inspects the application's repository, and writes \
                  a Dockerfile, Terraform definition, deploy script, compose file and README \
                  into deployment_<name>/. Nothing is executed."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate a deployment bundle",
        long_about = "Extracts the deployment intent from DESCRIPTION, refines it with evidence \
                      from the repository when --repo is given, and writes the bundle.\n\n\
                      Examples:\n  \
                      autodeploy generate \"Deploy my Flask app on AWS using containers\"\n  \
                      autodeploy generate \"node api on gcp\" --repo https://github.com/acme/api\n  \
                      autodeploy generate \"django site, azure vm\" --repo ./site --dry-run"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Show the evidence found in a local repository",
        long_about = "Scans a local directory for dependency manifests and entry points and \
                      prints the detected framework, port and dependencies.\n\n\
                      Examples:\n  \
                      autodeploy inspect .\n  \
                      autodeploy inspect ./service --format json"
    )]
    Inspect(InspectArgs),

    #[command(
        about = "Show the configuration extracted from a description",
        long_about = "Runs intent extraction only, without any repository.\n\n\
                      Examples:\n  \
                      autodeploy parse \"Deploy my express api to gcp serverless\""
    )]
    Parse(ParseArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        value_name = "DESCRIPTION",
        required = true,
        num_args = 1..,
        help = "What to deploy, in plain words"
    )]
    pub description: Vec<String>,

    #[arg(
        short = 'r',
        long,
        value_name = "LOCATOR",
        help = "GitHub URL, .tar.gz URL or local directory of the application"
    )]
    pub repo: Option<String>,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Directory in which deployment_<name>/ is created (defaults to AUTODEPLOY_OUTPUT_ROOT or .)"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(long, help = "Print the summary without writing any files")]
    pub dry_run: bool,
}

impl GenerateArgs {
    pub fn description(&self) -> String {
        self.description.join(" ")
    }
}

#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    #[arg(value_name = "PATH", default_value = ".", help = "Path to repository")]
    pub path: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ParseArgs {
    #[arg(
        value_name = "DESCRIPTION",
        required = true,
        num_args = 1..,
        help = "What to deploy, in plain words"
    )]
    pub description: Vec<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

impl ParseArgs {
    pub fn description(&self) -> String {
        self.description.join(" ")
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
