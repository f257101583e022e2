use bomscan_detector::DetectorType;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Dependency detector for multi-ecosystem source trees
#[derive(Parser, Debug)]
#[command(
    name = "bomscan",
    about = "Dependency detector for multi-ecosystem source trees",
    version,
    long_about = "bomscan walks a project directory, decides which package-ecosystem \
                  detectors apply in each subdirectory (npm, Maven, Gradle, pip, Go \
                  modules, Cargo), extracts their dependency graphs, and reports the \
                  resulting code locations."
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
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Scan a directory for package-manager dependencies",
        long_about = "Walks the directory tree, evaluates every detector rule against \
                      each directory, and reports detector statuses, code locations, \
                      and the suggested project name/version.\n\n\
                      Examples:\n  \
                      bomscan scan\n  \
                      bomscan scan /path/to/project\n  \
                      bomscan scan --format json -o report.json\n  \
                      bomscan scan --exclude target --exclude-pattern 'build*'"
    )]
    Scan(ScanArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ScanArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the project (defaults to current directory)"
    )]
    pub project_path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        long = "exclude",
        value_name = "NAME",
        help = "Directory name to skip during the walk (repeatable)"
    )]
    pub exclude: Vec<String>,

    #[arg(
        long = "exclude-pattern",
        value_name = "GLOB",
        help = "Directory name glob to skip during the walk (repeatable)"
    )]
    pub exclude_pattern: Vec<String>,

    #[arg(long, value_name = "DEPTH", help = "Maximum directory depth to walk")]
    pub max_depth: Option<usize>,

    #[arg(
        long,
        help = "Do not descend beneath a directory where a detector already matched"
    )]
    pub stop_at_match: bool,

    #[arg(
        long,
        help = "Skip detectables that invoke package-manager executables (npm, go)"
    )]
    pub no_cli_detectables: bool,

    #[arg(
        long,
        value_name = "TYPE",
        value_parser = parse_detector_type,
        help = "Force the project name/version suggestion to come from this detector type"
    )]
    pub project_detector: Option<DetectorType>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_detector_type(value: &str) -> Result<DetectorType, String> {
    DetectorType::parse(value).ok_or_else(|| {
        let known: Vec<String> = DetectorType::all().iter().map(|t| t.to_string()).collect();
        format!(
            "unknown detector type '{}'. Valid types: {}",
            value,
            known.join(", ")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detector_type_accepts_any_case() {
        assert_eq!(parse_detector_type("npm"), Ok(DetectorType::Npm));
        assert_eq!(parse_detector_type("Go_Mod"), Ok(DetectorType::GoMod));
        assert!(parse_detector_type("bazel").is_err());
    }

    #[test]
    fn test_scan_args_parse() {
        let args = CliArgs::try_parse_from([
            "bomscan",
            "scan",
            "/tmp/project",
            "--exclude",
            "target",
            "--exclude-pattern",
            "build*",
            "--max-depth",
            "4",
            "--no-cli-detectables",
            "--project-detector",
            "maven",
            "--format",
            "json",
        ])
        .unwrap();

        let Commands::Scan(scan) = args.command;
        assert_eq!(scan.project_path.as_deref(), Some(std::path::Path::new("/tmp/project")));
        assert_eq!(scan.exclude, vec!["target".to_string()]);
        assert_eq!(scan.exclude_pattern, vec!["build*".to_string()]);
        assert_eq!(scan.max_depth, Some(4));
        assert!(scan.no_cli_detectables);
        assert_eq!(scan.project_detector, Some(DetectorType::Maven));
        assert_eq!(scan.format, OutputFormatArg::Json);
    }
}
