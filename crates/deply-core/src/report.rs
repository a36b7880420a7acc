//! Violation report rendering: text, JSON and HTML.

use std::fmt::Write as _;

use html_escape::encode_text;

use crate::types::Violation;

/// Output format for a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// `<file>:<line> - <message> (<kind> <name>)`, one per line.
    #[default]
    Text,
    /// Pretty-printed JSON array.
    Json,
    /// Standalone HTML document with one table.
    Html,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            other => Err(format!("unknown report format `{other}`")),
        }
    }
}

/// Renders violations in `format`. Violations are rendered in the order
/// given; [`crate::AnalysisResult`] already holds them sorted.
///
/// # Errors
///
/// Returns error if JSON serialization fails (e.g. a non UTF-8 path).
pub fn render(violations: &[Violation], format: ReportFormat) -> Result<String, serde_json::Error> {
    Ok(match format {
        ReportFormat::Text => render_text(violations),
        ReportFormat::Json => serde_json::to_string_pretty(violations)?,
        ReportFormat::Html => render_html(violations),
    })
}

fn render_text(violations: &[Violation]) -> String {
    let mut out = String::new();
    for v in violations {
        let _ = writeln!(out, "{v}");
    }
    out
}

fn render_html(violations: &[Violation]) -> String {
    let mut out = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>deply report</title>\n</head>\n<body>\n<h1>Violations</h1>\n<table>\n<tr><th>File</th><th>Line</th><th>Column</th><th>Element</th><th>Kind</th><th>Type</th><th>Message</th></tr>\n",
    );
    for v in violations {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            encode_text(&v.file.display().to_string()),
            v.line,
            v.column,
            encode_text(&v.element_name),
            v.element_kind,
            v.violation_type,
            encode_text(&v.message),
        );
    }
    out.push_str("</table>\n</body>\n</html>\n");
    out
}
