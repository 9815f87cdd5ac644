//! Presentation of validation results
//!
//! Two formats: a line-oriented summary for terminals and pretty-printed
//! JSON for tooling.

use std::fmt;
use std::str::FromStr;

use crate::validators::ValidationResult;

/// How a [`ValidationResult`] is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// `✓`/`✗` summary with one bullet per error
    #[default]
    Text,
    /// Pretty-printed JSON object
    Json,
}

impl OutputFormat {
    /// Render a result in this format
    pub fn render(&self, result: &ValidationResult) -> serde_json::Result<String> {
        match self {
            OutputFormat::Text => Ok(render_text(result)),
            OutputFormat::Json => render_json(result),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Human-readable summary, newline terminated
pub fn render_text(result: &ValidationResult) -> String {
    if result.valid {
        return format!("✓ XML file '{}' is valid\n", result.subject);
    }

    let mut out = format!("✗ XML file '{}' is invalid:\n", result.subject);
    for error in &result.errors {
        out.push_str("  - ");
        out.push_str(error);
        out.push('\n');
    }
    out
}

/// Pretty-printed JSON (`valid`, `filename`, `errors` when non-empty)
pub fn render_json(result: &ValidationResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}
