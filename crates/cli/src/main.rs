//! Dual-clock AXI conformance matrix CLI.
//!
//! This binary is the command-line surface of the harness. It provides:
//! 1. **Run:** Load a JSON matrix configuration (or the reference defaults), run every
//!    combination and print the report, exiting non-zero if any combination did not pass.
//! 2. **Show config:** Print the effective configuration as JSON.
//!
//! Log verbosity follows `RUST_LOG` (default `warn`; `info` shows one line per combination).

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mcdc_core::{HarnessError, MatrixConfig, run_matrix};

#[derive(Parser, Debug)]
#[command(
    name = "mcdc",
    author,
    version,
    about = "Dual-clock AXI crossing conformance harness",
    long_about = "Run the clock-period x pacing test matrix against the AXI clock-crossing model.\n\nExamples:\n  mcdc run\n  mcdc run --config matrix.json --json\n  RUST_LOG=info mcdc run --seed 42\n  mcdc show-config > matrix.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the test matrix.
    Run {
        /// JSON matrix configuration; defaults are used for missing fields.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the base seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Print the report as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as JSON.
    ShowConfig {
        /// JSON matrix configuration to merge with defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Run { config, seed, json } => cmd_run(config, seed, json),
        Commands::ShowConfig { config } => cmd_show_config(config),
    };
    process::exit(code);
}

fn load_config(path: Option<PathBuf>) -> Result<MatrixConfig, HarnessError> {
    path.map_or_else(|| Ok(MatrixConfig::default()), MatrixConfig::from_file)
}

/// Runs the matrix and prints the report; returns the process exit code.
fn cmd_run(path: Option<PathBuf>, seed: Option<u64>, json: bool) -> i32 {
    let mut config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    tracing::debug!(?config, "configuration loaded");

    let report = match run_matrix(&config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };

    if json {
        match report.to_json() {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("error: {e}");
                return 2;
            }
        }
    } else {
        report.print();
    }

    i32::from(!report.all_passed())
}

fn cmd_show_config(path: Option<PathBuf>) -> i32 {
    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    match serde_json::to_string_pretty(&config) {
        Ok(text) => {
            println!("{text}");
            0
        }
        Err(e) => {
            eprintln!("error: {e}");
            2
        }
    }
}
