//! Logscan command-line entry point.
//!
//! Scans every compressed archive under a directory for PII, mirrors the
//! extracts under the output root and writes an indicator file once done.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use logscan_core::{AppConfig, ConfigError, ScanSummary, COMPLETION_BANNER};
use logscan_detect::Catalog;
use logscan_scanner::{CancellationToken, ScanError, ScanOrchestrator, ScanReport};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};

/// Find PII in compressed log archives.
#[derive(Debug, Parser)]
#[command(name = "logscan", version, about)]
struct Cli {
    /// Directory scanned recursively for `.gz` archives
    #[arg(value_name = "INPUT_DIR")]
    input: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of archives processed concurrently
    #[arg(short = 'j', long, value_name = "N")]
    concurrency: Option<usize>,

    /// Directory under which extracts are written
    #[arg(long, value_name = "DIR")]
    output_root: Option<PathBuf>,

    /// Print the summary as JSON instead of the banner
    #[arg(long)]
    json: bool,

    /// Print the detectors in catalog order and exit
    #[arg(long)]
    list_detectors: bool,
}

impl Cli {
    /// Resolve configuration: defaults, then file, then environment, then flags.
    fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load_from(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => match AppConfig::load() {
                Ok(config) => config,
                Err(ConfigError::NoConfigDir) => {
                    debug!("No config directory, using defaults");
                    AppConfig::default()
                }
                Err(e) => return Err(e).context("failed to load config"),
            },
        };

        config.apply_env_overrides();

        if let Some(n) = self.concurrency {
            config.scanning.concurrent_archives = n;
        }
        if let Some(dir) = &self.output_root {
            config.scanning.output_root.clone_from(dir);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,logscan=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.list_detectors {
        for name in Catalog::builtin().names() {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    let Some(input) = cli.input.clone() else {
        println!("{}", Cli::command().render_usage());
        return ExitCode::SUCCESS;
    };

    init_tracing();

    match run(&cli, &input).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, input: &Path) -> Result<()> {
    if !input.is_dir() {
        return Err(ScanError::NotADirectory {
            path: input.to_path_buf(),
        }
        .into());
    }

    let config = cli.resolve_config()?;
    info!("Starting logscan v{}", env!("CARGO_PKG_VERSION"));

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let orchestrator =
        ScanOrchestrator::new(Catalog::builtin(), config.scanning).with_cancellation(cancel);
    let output_dir = orchestrator.output_dir(input).await?;
    println!("Output will be under: {}", absolute(&output_dir).display());

    let report = orchestrator.run_scan(input).await?;

    print_report(&report, cli.json)?;
    Ok(())
}

/// Cancel the scan on the first Ctrl-C.
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupted, finishing in-flight archives");
                cancel.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    });
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
}

fn print_report(report: &ScanReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&report.summary)?);
    } else {
        println!("{}", banner_text(&report.summary));
    }

    match &report.indicator {
        Some(path) => println!("Indicator file created: {}", path.display()),
        None => eprintln!("Indicator file could not be written"),
    }
    Ok(())
}

fn banner_text(summary: &ScanSummary) -> String {
    format!("\n{}\n{}", summary.render(), COMPLETION_BANNER)
}
