use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod info;
mod scan;
mod validate;

pub use config::Config;

/// bdf-inspect - inspect and validate ALMA Binary Data Format files
#[derive(Parser)]
#[command(name = "bdf-inspect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the global header of a BDF file
    Info {
        /// Input BDF file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Stream every subset of a BDF file
    Scan {
        /// Input BDF file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Read subsets in batches of this size instead of one at a time
        #[arg(short = 'b', long)]
        batch: Option<usize>,

        /// Print a JSON document instead of one line per subset
        #[arg(long)]
        json: bool,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Validate BDF file integrity
    Validate {
        /// Input BDF file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Info { file } => info::run(file),
        Commands::Scan {
            file,
            batch,
            json,
            config,
        } => scan::run(file, batch, json, config),
        Commands::Validate { file, config } => validate::run(file, config),
    }
}
