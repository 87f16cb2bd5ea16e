//! Resolve command implementation

use super::config::CliConfig;
use super::output::{self, OutputFormat};
use super::{load_records, read_input};
use crate::path::{InMemoryLoader, PathResolver};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// Configuration for resolve command
pub struct ResolveConfig {
    /// Record text of the starting document, or `@file`
    pub document: String,
    pub paths: Vec<String>,
    /// Record store file used to follow links
    pub records: Option<PathBuf>,
    pub config: CliConfig,
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// Resolve field paths against a document
pub fn resolve(config: ResolveConfig) -> Result<()> {
    if config.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let codec = config.config.codec();
    let text = read_input(&config.document)?;
    let document = codec
        .decode_document(&text)
        .context("Failed to decode starting document")?;

    let loader = match &config.records {
        Some(path) => InMemoryLoader::from_documents(load_records(path, &codec)?),
        None => InMemoryLoader::new(),
    };
    let resolver = PathResolver::new(&loader).with_codec(codec.clone());

    let mut lines = Vec::with_capacity(config.paths.len());
    for path in &config.paths {
        let value = resolver
            .resolve(&document, path)
            .with_context(|| format!("Failed to resolve '{path}'"))?;
        let literal = codec.encode(&value, None)?;
        let rendered = output::format_value(&value, &literal, config.format)?;
        lines.push(match config.format {
            OutputFormat::Text if config.paths.len() > 1 => {
                format!("{} = {}", path.cyan(), rendered)
            }
            _ => rendered,
        });
    }

    output::write_output(&lines.join("\n"), config.output_file.as_deref())
}
