use clap::Parser;
use lockwarden::adapters::outbound::console::StderrProgressReporter;
use lockwarden::adapters::outbound::filesystem::FileSystemReader;
use lockwarden::application::dto::ScanRequest;
use lockwarden::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use lockwarden::application::use_cases::ScanProjectUseCase;
use lockwarden::cli::Args;
use lockwarden::config::{discover_config, load_config_from_path, ScanSettings};
use lockwarden::shared::error::ExitCode;
use lockwarden::shared::Result;
use lockwarden::threat_detection::policies::ScanStatus;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the diagnostic log filter
const LOG_ENV: &str = "LOCKWARDEN_LOG";

fn main() {
    // Usage errors exit with ExitCode::InvalidArguments, --help/--version with 0
    let args = Args::try_parse().unwrap_or_else(|e| e.exit());

    if let Err(e) = init_tracing() {
        eprintln!("⚠️  Warning: {}", e);
    }

    match run(args) {
        Ok(ScanStatus::Pass) => process::exit(ExitCode::Success.as_i32()),
        Ok(ScanStatus::IssuesFound) => process::exit(ExitCode::IssuesFound.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

/// Diagnostics go to stderr, filtered by `LOCKWARDEN_LOG` (default `warn`)
fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {}", e))
}

fn run(args: Args) -> Result<ScanStatus> {
    let project_path = args.path.clone().unwrap_or_else(|| PathBuf::from("."));

    // Explicit --config must exist; the default location is optional
    let config = match args.config.as_deref() {
        Some(path) => Some(load_config_from_path(path)?),
        None => discover_config(&project_path)?,
    };
    let settings = ScanSettings::resolve(args, config)?;

    // Create adapters (Dependency Injection)
    let use_case = ScanProjectUseCase::new(
        FileSystemReader::new(),
        FileSystemReader::new(),
        FileSystemReader::new(),
        StderrProgressReporter::new(),
    );

    let mut request = ScanRequest::builder()
        .project_path(settings.project_path)
        .database_path(settings.database_path)
        .ignore_patterns(settings.ignore_patterns)
        .severity_threshold(settings.severity_threshold);
    if let Some(lockfile) = settings.lockfile_path {
        request = request.lockfile_path(lockfile);
    }

    let response = use_case.execute(request.build()?)?;

    let presenter_type = PresenterType::from_output(settings.output);
    eprintln!("{}", FormatterFactory::progress_message(settings.format));
    let formatter = FormatterFactory::create(settings.format, presenter_type.supports_color());
    let report = formatter.format(&response.result)?;

    PresenterFactory::create(presenter_type).present(&report)?;

    Ok(response.status)
}
