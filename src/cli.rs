use clap::Parser;
use std::path::PathBuf;

use crate::application::dto::OutputFormat;
use crate::threat_detection::domain::Severity;

/// Scan npm, pnpm and yarn projects for known supply-chain threats
#[derive(Parser, Debug)]
#[command(name = "lockwarden")]
#[command(version)]
#[command(
    about = "Scan npm, pnpm and yarn projects for malicious, typosquatted and compromised packages",
    long_about = None
)]
pub struct Args {
    /// Path to the project directory (defaults to current directory)
    #[arg(short, long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Threat database (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Lock file to use instead of discovering one in the project directory
    #[arg(short, long, value_name = "FILE")]
    pub lockfile: Option<PathBuf>,

    /// Output format: json or text [default: text]
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Skip packages matching a pattern (exact name or "@scope/*").
    /// Can be specified multiple times: -i "left-pad" -i "@internal/*"
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore: Vec<String>,

    /// Minimum severity that fails the scan: critical, high, medium or low [default: low]
    #[arg(long, value_name = "LEVEL")]
    pub severity_threshold: Option<Severity>,

    /// Config file (defaults to lockwarden.config.yml in the project directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
