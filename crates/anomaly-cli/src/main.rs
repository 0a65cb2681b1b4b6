//! Revenue Anomaly - Main Entry Point

use anomaly_cli::{run, Cli};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    run(Cli::parse())
}
