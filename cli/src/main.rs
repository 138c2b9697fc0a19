//! Ticket Desk Simulator CLI
//!
//! # Example
//!
//! ```bash
//! # Simulate 4 desks and 25 customers, writing output/events.json
//! desk-sim run --seed 42
//!
//! # Summarise a trace as Markdown
//! desk-sim report --input output/events.json --output report.md
//! ```

mod config;

use clap::{Parser, Subcommand};
use config::{ConfigError, Overrides};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use ticket_desk_simulator_core_rs::{
    DeskReport, Orchestrator, ReportError, SimulationError, TraceDocument, TraceError,
};
use tracing::{error, info};

/// Ticket desk queue simulator
#[derive(Parser, Debug)]
#[command(name = "desk-sim")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log every customer step
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a simulation and write its trace as JSON
    Run {
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of desks
        #[arg(short, long)]
        desks: Option<usize>,

        /// Number of customers
        #[arg(long)]
        customers: Option<usize>,

        /// Service time per customer, in seconds
        #[arg(long)]
        service_duration: Option<f64>,

        /// RNG seed; the same seed reproduces the same trace
        #[arg(long)]
        seed: Option<u64>,

        /// Where to write the trace
        #[arg(short, long, default_value = "output/events.json")]
        output: PathBuf,
    },

    /// Compute per-desk statistics from a trace
    Report {
        /// Trace written by `run`
        #[arg(short, long, default_value = "output/events.json")]
        input: PathBuf,

        /// Markdown output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Trace(#[from] TraceError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so a report on stdout stays clean
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Run {
            config,
            desks,
            customers,
            service_duration,
            seed,
            output,
        } => {
            let overrides = Overrides {
                desks,
                customers,
                service_duration,
                seed,
            };
            run(config.as_deref(), &overrides, &output)
        }
        Command::Report { input, output } => report(&input, output.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: Option<&Path>, overrides: &Overrides, output: &Path) -> Result<(), CliError> {
    if let Some(path) = config_path {
        info!("Loading configuration from: {}", path.display());
    }
    let config = config::resolve(config_path, overrides)?;

    let mut orchestrator = Orchestrator::new(config)?;
    let summary = orchestrator.run()?;

    let trace = orchestrator.trace();
    trace.write_json(output)?;

    info!(
        served = summary.customers_served,
        events = summary.events_recorded,
        end_time = %summary.end_time,
        digest = %trace.digest()?,
        "trace written to {}",
        output.display()
    );
    Ok(())
}

fn report(input: &Path, output: Option<&Path>) -> Result<(), CliError> {
    let trace = TraceDocument::read_json(input)?;
    trace.validate()?;

    let report = DeskReport::from_trace(&trace)?;
    let text = report.render_markdown();

    match output {
        Some(path) => {
            fs::write(path, text)?;
            info!(
                desks = report.desks.len(),
                served = report.total_served(),
                "report written to {}",
                path.display()
            );
        }
        None => print!("{}", text),
    }
    Ok(())
}
