//! Application entry point.
//!
//! Parses command-line arguments, runs the build-file parse, and writes the
//! serialised graph to standard output.

use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt;
use tsumiki::{cli::Cli, parse};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let max_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::ERROR
    };
    fmt().with_max_level(max_level).init();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "parse failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let graph = parse::parse(&cli.file)?;
    let json = if cli.compact {
        serde_json::to_string(&graph)?
    } else {
        serde_json::to_string_pretty(&graph)?
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
