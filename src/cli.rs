//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure for the `tsumiki` binary, which
//! parses a single build file and writes the resulting graph as JSON.

use camino::Utf8PathBuf;
use clap::Parser;

/// Parse Ninja build files into a serialisable build graph.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the build file to parse; `-` reads standard input.
    #[arg(short, long, value_name = "FILE", default_value = "build.ninja")]
    pub file: Utf8PathBuf,

    /// Emit compact single-line JSON instead of pretty-printed output.
    #[arg(long)]
    pub compact: bool,

    /// Enable verbose logging output.
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_build_dot_ninja() {
        let cli = Cli::try_parse_from(["tsumiki"]).expect("parse");
        assert_eq!(cli.file, Utf8PathBuf::from("build.ninja"));
        assert!(!cli.compact);
    }

    #[test]
    fn dash_selects_stdin() {
        let cli = Cli::try_parse_from(["tsumiki", "-f", "-", "--compact"]).expect("parse");
        assert_eq!(cli.file.as_str(), "-");
        assert!(cli.compact);
    }
}
