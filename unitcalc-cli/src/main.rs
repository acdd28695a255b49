//! Command line front end for the unit calculator.

mod repl;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::repl::Repl;

#[derive(Parser, Debug, Clone)]
#[command(name = "unitcalc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Calculator for quantities with distance, time, mass and temperature units")]
pub struct ReplConfig {
    /// Digits printed after the decimal point
    #[arg(short, long, default_value_t = 6)]
    pub precision: usize,

    /// Print `none` for dimensionless results
    #[arg(long)]
    pub show_none: bool,

    /// File to load and save the line history from
    #[arg(long, value_name = "FILE")]
    pub history: Option<PathBuf>,

    /// Evaluate these lines in order and exit instead of starting the prompt
    #[arg(short, long = "eval", value_name = "EXPR")]
    pub eval: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let config = ReplConfig::parse();
    tracing::debug!(?config, "starting");

    let mut repl = Repl::new(config.clone());
    if config.eval.is_empty() {
        repl.run()?;
    } else {
        repl.run_batch(&config.eval);
    }
    Ok(())
}
