//! # bdf-inspect
//!
//! A command-line tool for inspecting ALMA Binary Data Format files.
//!
//! ## Usage
//!
//! ```bash
//! # Show the global header
//! bdf-inspect info integrations.bdf
//!
//! # Stream every subset, 32 at a time, as JSON
//! bdf-inspect scan integrations.bdf --batch 32 --json
//!
//! # Check the whole file
//! bdf-inspect -v validate integrations.bdf
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
