//! CLI argument definitions and shared statics.

use clap::builder::PossibleValuesParser;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "helios", version, about = "Helios gauge calibration tool")]
pub struct Cli {
    /// Path to the gauge profile TOML
    #[arg(long, value_name = "FILE", default_value = "etc/helios_profile.toml")]
    pub profile: PathBuf,

    /// Print results and errors as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging] level
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        value_parser = PossibleValuesParser::new(["error", "warn", "info", "debug", "trace"]),
        ignore_case = true
    )]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the profile and build every calibration table
    Check,
    /// Interpolate one or more values through a profile table
    Eval {
        /// Table name from the profile
        #[arg(long)]
        table: String,
        /// Telemetry values
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },
    /// Print a table's curve over an input range
    Sweep {
        #[arg(long)]
        table: String,
        #[arg(long, allow_negative_numbers = true)]
        from: f64,
        #[arg(long, allow_negative_numbers = true)]
        to: f64,
        /// Number of evenly spaced samples (>= 2)
        #[arg(long, default_value_t = 11)]
        steps: usize,
    },
    /// Feed `device,element,value` lines through the bound gauges
    Replay {
        /// Telemetry CSV (no header); stdin when omitted
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Interpolate values through a built-in table (no profile needed)
    Builtin {
        /// Built-in table name; `list` prints the available names
        name: String,
        #[arg(allow_negative_numbers = true)]
        values: Vec<f64>,
    },
}

impl Commands {
    pub fn needs_profile(&self) -> bool {
        !matches!(self, Self::Builtin { .. })
    }
}
