//! Output formatting

use console::{style, Term};
use locstore::{Diagnostic, LoadReport, LocatorStore, Severity};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::CliResult;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Writes command output to stdout
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
}

impl Reporter {
    /// Create a reporter
    #[must_use]
    pub fn new(use_color: bool) -> Self {
        Self {
            term: Term::stdout(),
            use_color,
        }
    }

    /// Write rendered output. Empty output writes nothing.
    pub fn emit(&self, rendered: &str) -> CliResult<()> {
        if !rendered.is_empty() {
            self.term.write_line(rendered.trim_end_matches('\n'))?;
        }
        Ok(())
    }
}

/// `key = selector` lines in key order
#[must_use]
pub fn render_store_text(store: &LocatorStore) -> String {
    store
        .iter()
        .map(|(key, selector)| format!("{key} = {selector}\n"))
        .collect()
}

/// The store as a JSON object
pub fn render_store_json(store: &LocatorStore) -> CliResult<String> {
    let map: serde_json::Map<String, serde_json::Value> = store
        .iter()
        .map(|(key, selector)| (key.to_string(), json!(selector)))
        .collect();
    Ok(serde_json::to_string_pretty(&map)?)
}

fn diagnostic_line(diagnostic: &Diagnostic, use_color: bool) -> String {
    let prefix = match (diagnostic.severity(), use_color) {
        (Severity::Error, true) => style("✗").red().bold().to_string(),
        (Severity::Warning, true) => style("⚠").yellow().bold().to_string(),
        (Severity::Error, false) => "ERROR".to_string(),
        (Severity::Warning, false) => "WARN".to_string(),
    };
    format!("{prefix} {diagnostic}")
}

/// Human-readable check result
#[must_use]
pub fn render_check_text(report: &LoadReport, missing: &[String], use_color: bool) -> String {
    let mut out = format!(
        "{} locators loaded from {} file(s), {} control(s) skipped\n",
        report.store.len(),
        report.store.sources().len(),
        report.skipped()
    );
    for diagnostic in &report.diagnostics {
        out.push_str(&diagnostic_line(diagnostic, use_color));
        out.push('\n');
    }
    if !missing.is_empty() {
        let label = if use_color {
            style("missing required:").red().bold().to_string()
        } else {
            "missing required:".to_string()
        };
        out.push_str(&format!("{label} {}\n", missing.join(", ")));
    }
    out
}

/// Check result as JSON
pub fn render_check_json(report: &LoadReport, missing: &[String]) -> CliResult<String> {
    let value = json!({
        "locators": report.store.len(),
        "sources": report.store.sources(),
        "skipped": report.skipped(),
        "diagnostics": report.diagnostics,
        "missing": missing,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}
