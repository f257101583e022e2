pub mod commands;
pub mod output;

pub use commands::{CliArgs, Commands, OutputFormatArg, ScanArgs};
pub use output::{OutputFormat, OutputFormatter, ScanReport};
