//! deply CLI tool.
//!
//! Usage:
//! ```bash
//! deply [-v...] [analyze --config <PATH> --report-format <FORMAT> --output <PATH>]
//! ```
//!
//! Exit codes: `0` no violations, `1` violations found, `2` configuration
//! or I/O error.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use deply::{ConfigError, ReportFormat};
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

const EXIT_VIOLATIONS: u8 = 1;
const EXIT_ERROR: u8 = 2;

/// Layered-architecture checker for Python code bases
#[derive(Parser)]
#[command(name = "deply")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the project against its layer rules (default)
    Analyze(AnalyzeArgs),
}

/// Options of the `analyze` command.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Path to configuration file (default: deply.yaml in the working directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormatArg::Text)]
    pub report_format: ReportFormatArg,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Report format selectable on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormatArg {
    /// One line per violation.
    #[default]
    Text,
    /// Pretty-printed JSON array.
    Json,
    /// Standalone HTML document.
    Html,
}

impl From<ReportFormatArg> for ReportFormat {
    fn from(arg: ReportFormatArg) -> Self {
        match arg {
            ReportFormatArg::Text => Self::Text,
            ReportFormatArg::Json => Self::Json,
            ReportFormatArg::Html => Self::Html,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = match cli.command {
        Some(Commands::Analyze(args)) => args,
        None => AnalyzeArgs::default(),
    };

    match commands::analyze::run(&args) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(EXIT_VIOLATIONS),
        Err(err) => {
            match err.downcast::<ConfigError>() {
                Ok(config_err) => eprintln!("{:?}", miette::Report::new(config_err)),
                Err(other) => eprintln!("Error: {other:#}"),
            }
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_analyze_with_defaults() {
        let cli = Cli::try_parse_from(["deply"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn verbosity_is_counted() {
        let cli = Cli::try_parse_from(["deply", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn analyze_options_parse() {
        let cli = Cli::try_parse_from([
            "deply",
            "analyze",
            "--config",
            "conf.yaml",
            "--report-format",
            "html",
            "--output",
            "out.html",
        ])
        .unwrap();
        let Some(Commands::Analyze(args)) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.config, Some(PathBuf::from("conf.yaml")));
        assert_eq!(args.report_format, ReportFormatArg::Html);
        assert_eq!(args.output, Some(PathBuf::from("out.html")));
    }

    #[test]
    fn unknown_report_format_is_rejected() {
        assert!(Cli::try_parse_from(["deply", "analyze", "--report-format", "xml"]).is_err());
    }
}
