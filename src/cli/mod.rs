pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, GenerateArgs, InspectArgs, ParseArgs};
pub use output::{OutputFormat, OutputFormatter};
