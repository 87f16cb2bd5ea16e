//! Decode command implementation

use super::config::CliConfig;
use super::output::{self, OutputFormat};
use super::read_input;
use crate::types::TypeTag;
use anyhow::{Context, Result};
use serde_json::{Value as JsonValue, json};
use std::path::PathBuf;

/// Configuration for decode command
pub struct DecodeConfig {
    pub text: String,
    pub tag: Option<TypeTag>,
    /// Decode a whole record body instead of a single value
    pub record: bool,
    pub config: CliConfig,
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// Decode record text, printing the value in canonical form
pub fn decode(config: DecodeConfig) -> Result<()> {
    let text = read_input(&config.text)?;
    let codec = config.config.codec();

    let content = if config.record {
        let document = codec.decode_document(&text)?;
        match config.format {
            OutputFormat::Text => codec.encode_document(&document)?,
            format => {
                let fields: serde_json::Map<String, JsonValue> = document
                    .fields()
                    .map(|(name, value)| -> serde_json::Result<_> {
                        Ok((name.to_string(), serde_json::to_value(value)?))
                    })
                    .collect::<serde_json::Result<_>>()
                    .context("Failed to serialize record")?;
                let value = json!({ "class": document.class_name(), "fields": fields });
                output::format_json(&value, format == OutputFormat::JsonPretty)?
            }
        }
    } else {
        let value = codec.decode(&text, config.tag)?;
        let literal = codec.encode(&value, config.tag)?;
        output::format_value(&value, &literal, config.format)?
    };

    output::write_output(&content, config.output_file.as_deref())
}
