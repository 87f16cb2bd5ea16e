//! Sort command implementation

use super::config::CliConfig;
use super::load_records;
use super::output::{self, OutputFormat};
use crate::path::{InMemoryLoader, OrderBy, PathResolver};
use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use std::path::PathBuf;

/// Configuration for sort command
pub struct SortConfig {
    pub records: PathBuf,
    /// Criteria as `path` or `path ASC|DESC`
    pub order_by: Vec<String>,
    pub config: CliConfig,
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// Print the records of a store file ordered by field paths
pub fn sort(config: SortConfig) -> Result<()> {
    let criteria = config
        .order_by
        .iter()
        .map(|criterion| {
            criterion
                .parse::<OrderBy>()
                .with_context(|| format!("Invalid sort criterion '{criterion}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    let codec = config.config.codec();
    let mut records = load_records(&config.records, &codec)?;
    let loader = InMemoryLoader::from_documents(records.iter().cloned());
    let resolver = PathResolver::new(&loader).with_codec(codec.clone());
    resolver.sort_documents(&mut records, &criteria)?;

    let lines = records
        .iter()
        .map(|record| -> Result<String> {
            Ok(format!("{} {}", record.identity(), codec.encode_document(record)?))
        })
        .collect::<Result<Vec<_>>>()?;

    let content = match config.format {
        OutputFormat::Text => lines.join("\n"),
        format => output::format_json(
            &JsonValue::from(lines),
            format == OutputFormat::JsonPretty,
        )?,
    };
    output::write_output(&content, config.output_file.as_deref())
}
