use bomscan_cli::cli::commands::{CliArgs, Commands, ScanArgs};
use bomscan_cli::cli::output::{build_report, OutputFormat, OutputFormatter};
use bomscan_cli::{NAME, VERSION};
use bomscan_core::executable::SystemExecutableResolver;
use bomscan_core::fs::{FileSystem, RealFileSystem};
use bomscan_core::ExitCodeType;
use bomscan_detectable::{create_rules, DetectableFactory};
use bomscan_detector::FinderOptions;
use bomscan_workflow::{DetectorTool, DetectorToolOptions, EventSystem, LoggingStatusListener};

use clap::Parser;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{debug, error, info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Scan(scan_args) => handle_scan(scan_args, args.quiet),
    };

    process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let level = if let Some(level_str) = &args.log_level {
            parse_level(level_str)
        } else if args.verbose {
            Level::DEBUG
        } else if args.quiet {
            Level::ERROR
        } else {
            let level_str = env::var("BOMSCAN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
            parse_level(&level_str)
        };

        let mut filter = EnvFilter::from_default_env();

        if env::var("RUST_LOG").is_err() {
            filter = filter.add_directive(format!("bomscan={}", level).parse().unwrap());
        }

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    });
}

fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

fn handle_scan(args: &ScanArgs, quiet: bool) -> i32 {
    info!("Starting dependency scan");

    let project_path = match resolve_project_path(args) {
        Ok(path) => path,
        Err(code) => return code,
    };
    debug!("Project path: {}", project_path.display());

    let mut finder = FinderOptions::default();
    finder.excluded_names.extend(args.exclude.iter().cloned());
    finder
        .excluded_patterns
        .extend(args.exclude_pattern.iter().cloned());
    if let Some(max_depth) = args.max_depth {
        finder.max_depth = max_depth;
    }
    finder.stop_at_detector_match = args.stop_at_match;

    let options = DetectorToolOptions {
        finder,
        output_root: env::temp_dir().join(format!("bomscan-{}", process::id())),
        project_detector: args.project_detector,
    };

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem::new());
    let factory = Arc::new(DetectableFactory::new(Arc::new(
        SystemExecutableResolver::new(),
    )));
    let rules = create_rules(&factory, !args.no_cli_detectables);
    debug!("Registered {} detector rules", rules.len());

    let mut events = EventSystem::new();
    events.add_listener(Box::new(LoggingStatusListener));

    let tool = DetectorTool::new(events);
    let result = match tool.perform_detectors(&fs, &project_path, &rules, &options) {
        Ok(result) => result,
        Err(err) => {
            error!("{}", err);
            if let Some(source) = &err.source {
                error!("Caused by: {}", source);
            }
            return err.exit_code.exit_code();
        }
    };

    let report = build_report(&project_path, &result);
    let format: OutputFormat = args.format.into();
    let formatter = OutputFormatter::new(format);

    let output = match formatter.format(&report) {
        Ok(output) => output,
        Err(err) => {
            error!("Failed to format output: {}", err);
            return ExitCodeType::FailureGeneral.exit_code();
        }
    };

    if let Some(output_file) = &args.output {
        match fs::write(output_file, &output) {
            Ok(()) => {
                info!("Output written to: {}", output_file.display());
                if !quiet {
                    println!("Output written to: {}", output_file.display());
                }
            }
            Err(err) => {
                error!("Failed to write output to file: {}", err);
                return ExitCodeType::FailureGeneral.exit_code();
            }
        }
    } else {
        println!("{}", output);
    }

    ExitCodeType::Success.exit_code()
}

fn resolve_project_path(args: &ScanArgs) -> Result<PathBuf, i32> {
    let path = match &args.project_path {
        Some(path) => path.clone(),
        None => match env::current_dir() {
            Ok(path) => path,
            Err(err) => {
                error!("Failed to get current directory: {}", err);
                return Err(ExitCodeType::FailureConfiguration.exit_code());
            }
        },
    };

    if !path.exists() {
        error!("Project path does not exist: {}", path.display());
        return Err(ExitCodeType::FailureConfiguration.exit_code());
    }
    if !path.is_dir() {
        error!("Project path is not a directory: {}", path.display());
        return Err(ExitCodeType::FailureConfiguration.exit_code());
    }

    match path.canonicalize() {
        Ok(path) => Ok(path),
        Err(err) => {
            error!("Failed to canonicalize project path: {}", err);
            Err(ExitCodeType::FailureConfiguration.exit_code())
        }
    }
}
