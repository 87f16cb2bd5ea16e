//! Coerce command implementation

use super::config::CliConfig;
use super::output::{self, OutputFormat};
use super::read_input;
use crate::types::TypeTag;
use anyhow::Result;
use std::path::PathBuf;

/// Configuration for coerce command
pub struct CoerceConfig {
    pub text: String,
    pub tag: TypeTag,
    pub config: CliConfig,
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// Apply the coercion rules for a declared type to a decoded literal
pub fn coerce(config: CoerceConfig) -> Result<()> {
    let text = read_input(&config.text)?;
    let codec = config.config.codec();

    let value = codec.decode(&text, None)?;
    let coerced = config.config.coercer().coerce(value, config.tag)?;
    let literal = codec.encode(&coerced, None)?;
    let content = output::format_value(&coerced, &literal, config.format)?;
    output::write_output(&content, config.output_file.as_deref())
}
