//! CLI functionality for the docrec tool
//!
//! This module contains all CLI-related functionality including:
//! - Literal inference, decoding, encoding and coercion
//! - Path resolution against a document and a record store file
//! - Ordering records by field paths
//! - Configuration, logging and output formatting

pub mod coerce;
pub mod config;
pub mod decode;
pub mod encode;
pub mod infer;
pub mod logger;
pub mod output;
pub mod resolve;
pub mod sort;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::codec::TextCodec;
use crate::types::{Document, RecordId};

/// Literal text given inline, or `@file` to read it from a file
pub fn read_input(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {path}"))?;
            Ok(content.trim_end_matches(['\r', '\n']).to_string())
        }
        None => Ok(arg.to_string()),
    }
}

/// Parse a record store file
///
/// One record per line, `#cluster:position` followed by whitespace and the
/// record text. Blank lines and lines starting with `//` are skipped.
pub fn parse_records(content: &str, codec: &TextCodec<'_>) -> Result<Vec<Document>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with("//")
        })
        .map(|(index, line)| -> Result<Document> {
            let line_no = index + 1;
            let (rid, body) = line
                .trim()
                .split_once(char::is_whitespace)
                .with_context(|| format!("line {line_no}: expected '#cluster:position record'"))?;
            let rid: RecordId = rid
                .parse()
                .with_context(|| format!("line {line_no}: invalid record id '{rid}'"))?;
            let mut document = codec
                .decode_document(body.trim())
                .with_context(|| format!("line {line_no}: invalid record"))?;
            document.set_identity(rid);
            document.mark_clean();
            Ok(document)
        })
        .collect()
}

/// Read and parse a record store file
pub fn load_records(path: &Path, codec: &TextCodec<'_>) -> Result<Vec<Document>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file: {}", path.display()))?;
    let records = parse_records(&content, codec)
        .with_context(|| format!("Invalid records file: {}", path.display()))?;
    log::debug!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    #[test]
    fn test_parse_records() {
        let content = "// people\n#9:1 Person@name:\"Ann\"\n\n#9:2   Person@name:\"Bob\",age:41\n";
        let records = parse_records(content, &TextCodec::default()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identity(), RecordId::new(9, 1));
        assert_eq!(records[1].field("age"), Some(&Value::Integer(41)));
    }

    #[test]
    fn test_parse_records_reports_line() {
        let err = parse_records("#9:1 ok:1\nbroken", &TextCodec::default()).unwrap_err();
        assert!(err.to_string().starts_with("line 2"), "{err}");
    }

    #[test]
    fn test_inline_input() {
        assert_eq!(read_input("42l").unwrap(), "42l");
    }
}
