//! CLI configuration file
//!
//! ```json
//! {
//!   "date_formats": { "date": "dd/MM/yyyy", "date_time": "dd/MM/yyyy HH:mm" },
//!   "schema": { "Person": { "age": "LONG", "born": "DATE" } }
//! }
//! ```
//!
//! Both sections are optional.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::codec::{SchemaMap, TextCodec};
use crate::types::{DateFormats, TypeCoercer};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub date_formats: DateFormats,
    pub schema: SchemaMap,
}

impl CliConfig {
    /// Read a config file, or the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        log::debug!(
            "loaded config from {} ({} date pattern)",
            path.display(),
            config.date_formats.date
        );
        Ok(config)
    }

    pub fn coercer(&self) -> TypeCoercer {
        TypeCoercer::new(self.date_formats.clone())
    }

    /// Codec using the configured date formats and schema
    pub fn codec(&self) -> TextCodec<'_> {
        TextCodec::new(self.coercer(), &self.schema)
    }
}
