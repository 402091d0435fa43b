//! battstat - battery health and telemetry from the macOS I/O Registry
//!
//! Runs `ioreg` once, parses the AppleSmartBattery properties and prints
//! them with units, followed by capacity health.

use anyhow::{Context, Result};
use battstat::errors::{EXIT_ENVIRONMENT_ERROR, EXIT_SUCCESS};
use battstat::logging;
use battstat::report::{write_report, ReportStyle};
use battstat_common::collector::{load_dump, Collector, RegistrySource};
use battstat_common::config::{BattstatConfig, ColorMode};
use battstat_common::error::CollectError;
use battstat_common::parsers::parse_registry;
use battstat_common::policy::{DisplayMode, DisplayPolicy};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

// Version is embedded at build time
const VERSION: &str = env!("BATTSTAT_VERSION");

#[derive(Parser)]
#[command(name = "battstat")]
#[command(about = "Battery health and telemetry from the macOS I/O Registry", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Show every field except the always-hidden ones
    #[arg(short, long)]
    verbose: bool,

    /// Registry query to run
    #[arg(long, value_enum, value_name = "SOURCE")]
    source: Option<SourceArg>,

    /// Parse a saved ioreg dump instead of running ioreg
    #[arg(long, value_name = "PATH")]
    from_file: Option<PathBuf>,

    /// Config file to use instead of the default locations
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    /// ioreg -r -c AppleSmartBattery
    SmartBattery,
    /// ioreg -l, narrowed to the battery node
    RegistryTree,
}

impl From<SourceArg> for RegistrySource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::SmartBattery => RegistrySource::SmartBattery,
            SourceArg::RegistryTree => RegistrySource::RegistryTree,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init();

    let code = match run(cli) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            match e.downcast_ref::<CollectError>() {
                Some(collect) => {
                    debug!(origin = collect.origin(), error = ?collect, "collection failed");
                    println!("{}", collect);
                }
                None => eprintln!("battstat: {:#}", e),
            }
            EXIT_ENVIRONMENT_ERROR
        }
    };

    std::process::exit(code);
}

fn run(cli: Cli) -> Result<()> {
    let config = BattstatConfig::load(cli.config.as_deref());

    let source = cli.source.map(RegistrySource::from).unwrap_or(config.source.kind);
    let probe = match &cli.from_file {
        Some(path) => load_dump(path, source)?,
        None => Collector::new(&config.source.ioreg_path, source).collect()?,
    };

    let record = parse_registry(&probe.stdout, source.line_shape());
    debug!(command = %probe.command, fields = record.len(), "registry parsed");

    let mode = if cli.verbose || config.display.verbose {
        DisplayMode::All
    } else {
        DisplayMode::Curated
    };
    let policy = DisplayPolicy::new(mode).with_exclusions(config.display.exclude.iter().cloned());

    let color = if cli.no_color {
        ColorMode::Never
    } else {
        config.display.color
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &record, &policy, ReportStyle::detect(color))
        .context("Failed to write report")?;
    out.flush().context("Failed to write report")?;

    Ok(())
}
