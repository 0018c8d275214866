//! line-guard CLI - command-line interface for line length enforcement
//!
//! CDD Principle: Application Layer - CLI coordinates user interactions with domain services
//! - Translates flags into a configuration and a run
//! - Handles external concerns like process exit codes and which stream gets what
//! - Exit 0 when clean, 1 on a line length finding, 2 when the run could not be performed

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use line_guard::{
    CheckOptions, LineGuard, LineGuardConfig, LineGuardError, OutputFormat, ReportFormatter,
    ReportOptions,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// line-guard - source line length enforcement
#[derive(Parser)]
#[command(name = "line-guard")]
#[command(version)]
#[command(about = "Check that every source line fits the configured maximum length")]
#[command(long_about = "Walks the tree under ROOT, checks every line of every source file \
against the maximum length, and fails on the first line that is too long or on a whitelisted \
line that is no longer too long.")]
struct Cli {
    /// Root of the tree to check
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Override the maximum line length
    #[arg(long)]
    max_line_length: Option<usize>,

    /// Report every violation instead of stopping at the first
    #[arg(long)]
    all: bool,

    /// Check files in parallel
    #[arg(long)]
    parallel: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormatArg,

    /// Additional exclude patterns
    #[arg(long, action = clap::ArgAction::Append)]
    exclude: Vec<String>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

const EXIT_VIOLATION: u8 = 1;
const EXIT_SETUP: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_SETUP)
        }
    }
}

/// Exit status for a run that stopped on an error
fn exit_status(error: &LineGuardError) -> u8 {
    if error.is_violation() {
        EXIT_VIOLATION
    } else {
        EXIT_SETUP
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;
    let format = OutputFormat::from(cli.format);
    let formatter = ReportFormatter::new(ReportOptions {
        use_colors: !cli.no_color && format == OutputFormat::Human,
        max_line_length: config.max_line_length,
    });

    let guard = LineGuard::new(config).context("invalid configuration")?;
    let options = CheckOptions {
        parallel: cli.parallel,
    };

    if cli.all {
        let report = guard.check_all(&cli.root, &options)?;
        let rendered = formatter.format_report(&report, format)?;
        if report.has_violations() && format == OutputFormat::Human {
            eprintln!("{rendered}");
        } else {
            println!("{rendered}");
        }
        return Ok(if report.has_violations() {
            ExitCode::from(EXIT_VIOLATION)
        } else {
            ExitCode::SUCCESS
        });
    }

    match guard.check(&cli.root, &options) {
        Ok(summary) => {
            println!("{}", formatter.format_summary(&summary, format)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_violation() => {
            if let Some(violation) = e.violation() {
                let rendered = formatter.format_failure(violation, format)?;
                match format {
                    OutputFormat::Human => eprintln!("{rendered}"),
                    OutputFormat::Json => println!("{rendered}"),
                }
            }
            Ok(ExitCode::from(exit_status(&e)))
        }
        Err(e) => Err(e.into()),
    }
}

fn load_config(cli: &Cli) -> Result<LineGuardConfig> {
    let mut config = match &cli.config {
        Some(path) => LineGuardConfig::load_from_file(path)?,
        None => LineGuardConfig::discover_in(".")?,
    };

    if let Some(max) = cli.max_line_length {
        config.max_line_length = max;
    }
    config.exclude_patterns.extend(cli.exclude.iter().cloned());

    Ok(config)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
