//! Value and record decoding
//!
//! Text is first parsed into a syntax tree by [`crate::grammar`], then turned
//! into values here. Declared types steer the second step: a field declared
//! `LONG` reads `5` as a long, a field declared `DATE` reads a quoted string
//! with the configured date formats.

use crate::codec::TextCodec;
use crate::escape::unescape;
use crate::grammar::{self, Entry, Node, NodeKind, RecordNode};
use crate::inference::{parse_literal, parse_number};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use docrec_diagnostics::{RecordError, Result};
use docrec_types::{Document, RecordId, TrackedList, TrackedMap, TrackedSet, TypeTag, Value};
use indexmap::IndexMap;

impl TextCodec<'_> {
    /// Decode text under an optional declared type
    ///
    /// Empty text is null. Without a declared type, untagged text is read as
    /// a nested literal and, failing that, as an embedded record body.
    pub fn decode(&self, text: &str, declared: Option<TypeTag>) -> Result<Value> {
        if text.is_empty() {
            return Ok(Value::Null);
        }
        let result = match declared {
            None => self.decode_untagged(text),
            Some(TypeTag::Embedded) if !text.starts_with('(') => {
                let record = grammar::parse_record(text)?;
                self.build_record(text, record).map(Value::embedded)
            }
            Some(tag) if !tag.is_structural() => self.decode_scalar(text, text, 0, tag),
            Some(tag) => {
                let node = grammar::parse_value(text)?;
                self.build(text, node, Some(tag))
            }
        };
        result.inspect_err(|err| log::debug!("decoding '{text}' failed: {err}"))
    }

    /// Decode a record body into a fresh document
    pub fn decode_document(&self, text: &str) -> Result<Document> {
        let mut document = Document::new();
        self.decode_document_into(text, &mut document)?;
        document.mark_clean();
        Ok(document)
    }

    /// Decode a record body into an existing document
    ///
    /// All fields are decoded before any is stored; on failure `target` is
    /// unchanged. A class name in the text replaces the target's class.
    pub fn decode_document_into(&self, text: &str, target: &mut Document) -> Result<()> {
        let record = grammar::parse_record(text)?;

        let mut staging = Document::new();
        staging.set_class_name(
            record
                .class_name
                .map(str::to_owned)
                .or_else(|| target.class_name().map(str::to_owned)),
        );
        let fields = self.build_fields(text, &staging, record.fields)?;

        log::trace!(
            "decoded {} fields into record {}",
            fields.len(),
            target.identity()
        );
        if record.class_name.is_some() {
            target.set_class_name(staging.class_name().map(str::to_owned));
        }
        target.replace_fields(fields);
        Ok(())
    }

    /// Untagged text defaults to an embedded record when it reads as one
    fn decode_untagged(&self, text: &str) -> Result<Value> {
        let parsed = grammar::parse_value(text);
        let record_like = match &parsed {
            Ok(node) => matches!(node.kind, NodeKind::Token(token) if token.contains(':')),
            Err(_) => !text.starts_with(['(', '{', '[', '<', '_', '#']),
        };
        if record_like {
            if let Ok(record) = grammar::parse_record(text) {
                return self.build_record(text, record).map(Value::embedded);
            }
        }
        self.build(text, parsed?, None)
    }

    /// Scalar text under a declared tag
    ///
    /// The tag's own suffix is optional. Text that does not parse directly is
    /// read as an untagged literal and coerced.
    fn decode_scalar(&self, source: &str, token: &str, offset: usize, tag: TypeTag) -> Result<Value> {
        let direct = match tag {
            TypeTag::Boolean => match token {
                "true" => Some(Value::Boolean(true)),
                "false" => Some(Value::Boolean(false)),
                _ => None,
            },
            TypeTag::Link => token.parse::<RecordId>().ok().map(Value::Link),
            tag if tag.is_numeric() || tag == TypeTag::Date => {
                let body = tag
                    .suffix()
                    .and_then(|suffix| token.strip_suffix(suffix))
                    .unwrap_or(token);
                parse_number(body, tag)
            }
            TypeTag::String => grammar::parse_value(token)
                .ok()
                .and_then(|node| match node.kind {
                    NodeKind::Quoted(raw) => unescape(raw).ok().map(Value::String),
                    _ => None,
                })
                .or_else(|| Some(Value::string(token))),
            TypeTag::Binary => decode_binary_text(token),
            _ => None,
        };
        if let Some(value) = direct {
            return Ok(value);
        }

        let literal = parse_literal(token).map_err(|err| relocate(err, source, offset))?;
        self.coerce_at(literal, tag, source, offset)
    }

    fn build(&self, source: &str, node: Node<'_>, declared: Option<TypeTag>) -> Result<Value> {
        let offset = node.offset_in(source);
        let malformed = |message: &str| RecordError::malformed_literal(message, source, offset);

        let value = match node.kind {
            NodeKind::Empty => return Ok(Value::Null),
            NodeKind::Quoted(raw) => {
                let text = unescape(raw).map_err(|(at, message)| {
                    RecordError::malformed_literal(message, source, offset + 1 + at)
                })?;
                match declared {
                    Some(TypeTag::Binary) => {
                        return decode_binary_body(&text).ok_or_else(|| malformed("invalid base64"));
                    }
                    _ => Value::String(text),
                }
            }
            NodeKind::Binary(body) => BASE64
                .decode(body)
                .map(Value::Binary)
                .map_err(|_| malformed("invalid base64"))?,
            NodeKind::Link(text) => text
                .parse::<RecordId>()
                .map(Value::Link)
                .map_err(|_| malformed("invalid record id"))?,
            NodeKind::Token(token) => {
                return match declared {
                    Some(tag) => self.decode_scalar(source, token, offset, tag),
                    None => untagged_token(source, token, offset),
                };
            }
            NodeKind::Record(record) => Value::embedded(self.build_record(source, record)?),
            NodeKind::Map(entries) => {
                let mut map = TrackedMap::new();
                for entry in entries {
                    let key = entry_name(source, &entry)?;
                    map.insert(key, self.build(source, entry.value, None)?);
                }
                map.mark_clean();
                Value::Map(map)
            }
            NodeKind::List(items) => {
                let mut list = TrackedList::new();
                for item in items {
                    list.push(self.build(source, item, None)?);
                }
                list.mark_clean();
                Value::List(list)
            }
            NodeKind::Set(items) => {
                let mut set = TrackedSet::new();
                for item in items {
                    set.insert(self.build(source, item, None)?);
                }
                set.mark_clean();
                Value::Set(set)
            }
        };

        match declared {
            Some(tag) if value.kind_of() != Some(tag) => self.coerce_at(value, tag, source, offset),
            _ => Ok(value),
        }
    }

    fn build_record(&self, source: &str, record: RecordNode<'_>) -> Result<Document> {
        let mut document = Document::new();
        document.set_class_name(record.class_name.map(str::to_owned));
        let fields = self.build_fields(source, &document, record.fields)?;
        document.replace_fields(fields);
        document.mark_clean();
        Ok(document)
    }

    fn build_fields(
        &self,
        source: &str,
        document: &Document,
        entries: Vec<Entry<'_>>,
    ) -> Result<IndexMap<String, Value>> {
        let mut fields = IndexMap::with_capacity(entries.len());
        for entry in entries {
            let name = entry_name(source, &entry)?;
            let declared = self.schema.declared_type(document, &name);
            let value = self.build(source, entry.value, declared)?;
            fields.insert(name, value);
        }
        Ok(fields)
    }

    fn coerce_at(&self, value: Value, tag: TypeTag, source: &str, offset: usize) -> Result<Value> {
        self.coercer.coerce(value, tag).map_err(|err| {
            RecordError::malformed_literal(err.to_diagnostic().message, source, offset)
        })
    }
}

fn untagged_token(source: &str, token: &str, offset: usize) -> Result<Value> {
    match token {
        "true" => Ok(Value::Boolean(true)),
        "false" => Ok(Value::Boolean(false)),
        _ => parse_literal(token).map_err(|err| relocate(err, source, offset)),
    }
}

fn entry_name(source: &str, entry: &Entry<'_>) -> Result<String> {
    if !entry.quoted {
        return Ok(entry.name.to_owned());
    }
    let start = source.len().saturating_sub(entry.rest);
    unescape(entry.name)
        .map_err(|(at, message)| RecordError::malformed_literal(message, source, start + 1 + at))
}

/// A quoted or `_` wrapped binary body
fn decode_binary_text(token: &str) -> Option<Value> {
    let body = token
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .or_else(|| {
            token
                .strip_prefix('_')
                .and_then(|rest| rest.strip_suffix('_'))
        })?;
    decode_binary_body(body)
}

/// Base64, or a single char standing for one byte
fn decode_binary_body(body: &str) -> Option<Value> {
    if let Ok(bytes) = BASE64.decode(body) {
        return Some(Value::Binary(bytes));
    }
    let mut chars = body.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => u8::try_from(u32::from(c))
            .ok()
            .map(|byte| Value::Binary(vec![byte])),
        _ => None,
    }
}

/// Point an error raised on a token at its place in the whole source
fn relocate(err: RecordError, source: &str, base: usize) -> RecordError {
    match err {
        RecordError::MalformedLiteral {
            message, offset, ..
        } => RecordError::malformed_literal(message, source, base + offset),
        other => other,
    }
}
