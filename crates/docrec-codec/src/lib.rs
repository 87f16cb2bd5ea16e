//! Type-tagged textual codec for field values
//!
//! Values travel as compact literals whose type is recoverable from the text:
//!
//! | Type      | Example              |
//! |-----------|----------------------|
//! | string    | `"Ann"`              |
//! | boolean   | `true`               |
//! | integer   | `42`                 |
//! | long      | `42l`                |
//! | short     | `7s`                 |
//! | byte      | `7b`                 |
//! | float     | `1.5f`               |
//! | double    | `1.5d`               |
//! | date      | `1705276800000t`     |
//! | link      | `#12:5`              |
//! | binary    | `"AQI="` / `_AQI=_`  |
//! | embedded  | `(Person@name:"Ann")`|
//! | map       | `{"k":1}`            |
//! | list      | `[1,2]`              |
//! | set       | `<1,2>`              |
//!
//! Null is the empty string. Declared types from a [`SchemaLookup`] override
//! what the text alone would suggest.
//!
//! # Example
//!
//! ```
//! use docrec_codec::{decode, encode};
//! use docrec_types::{TypeTag, Value};
//!
//! let text = encode(&Value::Long(42), None).unwrap();
//! assert_eq!(text, "42l");
//! assert_eq!(decode("42", Some(TypeTag::Long)).unwrap(), Value::Long(42));
//! ```

mod codec;
mod decode;
mod encode;
mod escape;
mod grammar;
mod inference;
mod schema;

pub use codec::TextCodec;
pub use inference::{infer_type, infer_value, parse_literal};
pub use schema::{NoSchema, SchemaLookup, SchemaMap};

use docrec_diagnostics::Result;
use docrec_types::{Document, TypeTag, Value};

/// Encode a value with the default codec
pub fn encode(value: &Value, declared: Option<TypeTag>) -> Result<String> {
    TextCodec::default().encode(value, declared)
}

/// Append the encoding of a value to `out`; `out` is unchanged on failure
pub fn encode_into(out: &mut String, value: &Value, declared: Option<TypeTag>) -> Result<()> {
    TextCodec::default().encode_into(out, value, declared)
}

/// Decode text with the default codec
pub fn decode(text: &str, declared: Option<TypeTag>) -> Result<Value> {
    TextCodec::default().decode(text, declared)
}

/// Encode a document's fields in record form without a schema
pub fn encode_document(document: &Document) -> Result<String> {
    TextCodec::default().encode_document(document)
}

/// Decode a record body into a new document without a schema
pub fn decode_document(text: &str) -> Result<Document> {
    TextCodec::default().decode_document(text)
}
