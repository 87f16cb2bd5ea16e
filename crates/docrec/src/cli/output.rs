//! Output formatting utilities

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::{Value as JsonValue, json};
use std::fs;
use std::io::IsTerminal;
use std::path::Path;

use crate::types::Value;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The record literal followed by its type
    #[default]
    Text,
    Json,
    JsonPretty,
}

impl OutputFormat {
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(str::to_lowercase).as_deref() {
            Some("json") => Self::Json,
            Some("pretty" | "json-pretty") => Self::JsonPretty,
            _ => Self::Text,
        }
    }
}

/// Set up color output based on user preference
pub fn setup_colors(mode: &str) {
    match mode.to_lowercase().as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::set_override(std::io::stdout().is_terminal()),
    }
}

/// Format an error for display
///
/// Record errors are rendered as diagnostics with the offending text marked.
pub fn format_error(error: &anyhow::Error) -> String {
    match error.downcast_ref::<crate::RecordError>() {
        Some(record_error) => record_error.to_diagnostic().render_colored(),
        None => format!("{} {:#}", "Error:".red().bold(), error),
    }
}

/// Exit status for a failed command
///
/// Record errors map to their category: 2 codec, 3 coercion, 4 path,
/// 5 storage. Everything else exits with 1.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    match error
        .downcast_ref::<crate::RecordError>()
        .map(crate::RecordError::code)
    {
        Some(code) if code.is_codec_error() => 2,
        Some(code) if code.is_coercion_error() => 3,
        Some(code) if code.is_path_error() => 4,
        Some(code) if code.is_storage_error() => 5,
        _ => 1,
    }
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

/// Write output to a file or stdout
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        fs::write(path, content)
            .with_context(|| format!("Failed to write to output file: {}", path.display()))?;
        eprintln!(
            "{}",
            format_success(&format!("Output written to {}", path.display()))
        );
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format JSON value for output
pub fn format_json(value: &JsonValue, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).context("Failed to serialize JSON")
    } else {
        serde_json::to_string(value).context("Failed to serialize JSON")
    }
}

/// Render a value with its wire form and type
pub fn format_value(value: &Value, literal: &str, format: OutputFormat) -> Result<String> {
    let kind = value
        .kind_of()
        .map_or_else(|| "NULL".to_string(), |tag| tag.to_string());

    match format {
        OutputFormat::Text => Ok(format!("{}  {}", literal, kind.dimmed())),
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let document = json!({
                "type": kind,
                "literal": literal,
                "value": serde_json::to_value(value).context("Failed to serialize value")?,
            });
            format_json(&document, format == OutputFormat::JsonPretty)
        }
    }
}
