//! Infer command implementation

use super::output::{self, OutputFormat};
use super::read_input;
use crate::codec::{encode, infer_type, infer_value, parse_literal};
use crate::diagnostics::{DR0100, Diagnostic, Span};
use anyhow::Result;
use std::path::PathBuf;

/// Configuration for infer command
pub struct InferConfig {
    pub text: String,
    /// Reject literals whose body does not parse as the inferred type
    pub strict: bool,
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// Infer the type of an untyped literal and show the parsed value
pub fn infer(config: InferConfig) -> Result<()> {
    let text = read_input(&config.text)?;
    let tag = infer_type(&text);
    log::debug!("'{text}' inferred as {tag}");

    let value = if config.strict {
        parse_literal(&text)?
    } else {
        infer_value(&text)
    };
    if value.kind_of().is_some_and(|kind| kind != tag) {
        let message = format!("body does not parse as {tag}, kept as text");
        let warning =
            Diagnostic::warning(DR0100, message).with_span(Span::new(0, text.len()), text.as_str());
        eprintln!("{}", warning.render_colored());
    }

    let literal = encode(&value, None)?;
    let content = output::format_value(&value, &literal, config.format)?;
    output::write_output(&content, config.output_file.as_deref())
}
