//! Report output to stdout or a file.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use deply::{render, ReportFormat, Violation};

/// Printed in place of an empty text report.
pub const NO_VIOLATIONS: &str = "No violations detected.";

/// Renders `violations` and writes them to `output`, or stdout if `None`.
pub fn write(violations: &[Violation], format: ReportFormat, output: Option<&Path>) -> Result<()> {
    let report = report_text(violations, format)?;
    match output {
        Some(path) => std::fs::write(path, report)
            .with_context(|| format!("Failed to write report to {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(report.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write report to stdout")
        }
    }
}

fn report_text(violations: &[Violation], format: ReportFormat) -> Result<String> {
    let report = render(violations, format).context("Failed to render report")?;
    if format == ReportFormat::Text && report.is_empty() {
        return Ok(format!("{NO_VIOLATIONS}\n"));
    }
    Ok(report)
}
