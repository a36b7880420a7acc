//! The `analyze` command.

use anyhow::{Context, Result};
use tracing::info;

use crate::{config_resolver, AnalyzeArgs};

/// Runs the analysis and writes the report.
///
/// Returns `true` when violations were found.
pub fn run(args: &AnalyzeArgs) -> Result<bool> {
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let source = config_resolver::resolve(&cwd, args.config.as_deref())?;
    info!("Using config: {}", source.path().display());

    let result = deply::run_file(source.path())?;
    info!(
        "Checked {} element(s) and {} edge(s), found {} violation(s)",
        result.elements_checked,
        result.edges_checked,
        result.violations.len()
    );

    super::output::write(
        &result.violations,
        args.report_format.into(),
        args.output.as_deref(),
    )?;
    Ok(result.has_violations())
}
