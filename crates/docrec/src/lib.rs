//! Record layer for schema-less documents
//!
//! This crate bundles:
//! - The value model and type coercion ([`types`])
//! - The type-tagged textual codec ([`codec`])
//! - Field path resolution over document graphs ([`path`])
//! - Error codes and diagnostics ([`diagnostics`])
//!
//! # Example
//!
//! ```
//! use docrec::{decode_document, resolve};
//! use docrec::types::Value;
//!
//! let doc = decode_document(r#"Person@name:"Ann",tags:["a","b"]"#).unwrap();
//! assert_eq!(resolve(&doc, "tags[1]").unwrap(), Value::string("b"));
//! ```

pub use docrec_codec as codec;
pub use docrec_diagnostics as diagnostics;
pub use docrec_path as path;
pub use docrec_types as types;

// Convenience re-exports
pub use docrec_codec::{
    SchemaLookup, SchemaMap, TextCodec, decode, decode_document, encode, encode_document,
    encode_into, infer_type, infer_value, parse_literal,
};
pub use docrec_diagnostics::{RecordError, Result};
pub use docrec_path::{InMemoryLoader, PathResolver, RecordLoader, resolve};
pub use docrec_types::{Document, RecordId, TypeTag, TypeCoercer, Value, coerce};

#[cfg(feature = "cli")]
pub mod cli;
