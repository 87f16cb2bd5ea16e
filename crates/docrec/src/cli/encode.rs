//! Encode command implementation

use super::config::CliConfig;
use super::output::{self, OutputFormat};
use super::read_input;
use crate::types::TypeTag;
use anyhow::Result;
use std::path::PathBuf;

/// Configuration for encode command
pub struct EncodeConfig {
    pub text: String,
    pub tag: TypeTag,
    pub config: CliConfig,
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// Re-encode a literal under a declared type
///
/// The input is decoded without a type first, so `42` encoded as LONG
/// becomes `42l`.
pub fn encode(config: EncodeConfig) -> Result<()> {
    let text = read_input(&config.text)?;
    let codec = config.config.codec();

    let value = codec.decode(&text, None)?;
    let literal = codec.encode(&value, Some(config.tag))?;
    let content = match config.format {
        OutputFormat::Text => literal,
        format => {
            let converted = codec.decode(&literal, Some(config.tag))?;
            output::format_value(&converted, &literal, format)?
        }
    };
    output::write_output(&content, config.output_file.as_deref())
}
