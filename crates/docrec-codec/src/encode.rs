//! Value and record encoding

use crate::codec::TextCodec;
use crate::escape::write_quoted;
use crate::grammar::is_class_char;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use docrec_diagnostics::{RecordError, Result};
use docrec_types::{Document, TypeTag, Value};
use regex::Regex;
use std::fmt::Write;
use std::sync::LazyLock;

/// Field names that can be written without quotes
static BARE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$-]*$").expect("valid field name pattern")
});

pub fn is_bare_name(name: &str) -> bool {
    BARE_NAME.is_match(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    TopLevel,
    Nested,
}

impl TextCodec<'_> {
    /// Encode a value under an optional declared type
    ///
    /// Without a declared type the value's own kind is used. Null encodes to
    /// the empty string.
    pub fn encode(&self, value: &Value, declared: Option<TypeTag>) -> Result<String> {
        let mut out = String::new();
        self.encode_into(&mut out, value, declared)?;
        Ok(out)
    }

    /// Append the encoding of a value to `out`
    ///
    /// On failure `out` is left exactly as it was.
    pub fn encode_into(
        &self,
        out: &mut String,
        value: &Value,
        declared: Option<TypeTag>,
    ) -> Result<()> {
        let mark = out.len();
        self.write_value(out, value, declared, Position::TopLevel)
            .inspect_err(|err| {
                log::debug!("encoding failed: {err}");
                out.truncate(mark);
            })
    }

    /// Encode the fields of a document in record form, `Class@name:value,...`
    pub fn encode_document(&self, document: &Document) -> Result<String> {
        let mut out = String::new();
        self.encode_document_into(&mut out, document)?;
        Ok(out)
    }

    /// Append the record form of a document to `out`, leaving it untouched on failure
    pub fn encode_document_into(&self, out: &mut String, document: &Document) -> Result<()> {
        let mark = out.len();
        self.write_record(out, document).inspect_err(|err| {
            log::debug!("encoding record {} failed: {err}", document.identity());
            out.truncate(mark);
        })
    }

    fn write_record(&self, out: &mut String, document: &Document) -> Result<()> {
        if let Some(class_name) = document.class_name() {
            check_class_name(class_name)?;
            out.push_str(class_name);
            out.push('@');
        }
        for (index, (name, value)) in document.fields().enumerate() {
            if index > 0 {
                out.push(',');
            }
            write_name(out, name);
            out.push(':');
            let declared = self.schema.declared_type(document, name);
            self.write_value(out, value, declared, Position::Nested)?;
        }
        Ok(())
    }

    fn write_value(
        &self,
        out: &mut String,
        value: &Value,
        declared: Option<TypeTag>,
        position: Position,
    ) -> Result<()> {
        let Some(tag) = declared.or_else(|| value.kind_of()) else {
            return Ok(());
        };
        if value.is_null() {
            return Ok(());
        }

        match tag {
            TypeTag::Byte => return self.write_byte(out, value),
            TypeTag::Binary => return self.write_binary(out, value, position),
            _ => {}
        }

        let value = self.conform(value, tag)?;
        match (tag, value.as_ref()) {
            (TypeTag::String, Value::String(s)) => write_quoted(out, s),
            (TypeTag::String, Value::Enum(constant)) => write_quoted(out, &constant.name),
            (TypeTag::Boolean, Value::Boolean(b)) => out.push_str(if *b { "true" } else { "false" }),
            (TypeTag::Integer, Value::Integer(n)) => write_number(out, n, None),
            (TypeTag::Short, Value::Short(n)) => write_number(out, n, tag.suffix()),
            (TypeTag::Long, Value::Long(n)) => write_number(out, n, tag.suffix()),
            (TypeTag::Float, Value::Float(n)) => write_number(out, n, tag.suffix()),
            (TypeTag::Double, Value::Double(n)) => write_number(out, n, tag.suffix()),
            (TypeTag::Date, Value::Date(instant)) => {
                write_number(out, instant.timestamp_millis(), tag.suffix())
            }
            (TypeTag::Link, Value::Link(rid)) => write_number(out, rid, None),
            (TypeTag::Embedded, Value::Embedded(document)) => {
                out.push('(');
                self.write_record(out, document)?;
                out.push(')');
            }
            (TypeTag::EmbeddedMap, Value::Map(map)) => {
                out.push('{');
                for (index, (key, item)) in map.iter().enumerate() {
                    if index > 0 {
                        out.push(',');
                    }
                    write_quoted(out, key);
                    out.push(':');
                    self.write_value(out, item, None, Position::Nested)?;
                }
                out.push('}');
            }
            (TypeTag::EmbeddedList, Value::List(list)) => {
                self.write_items(out, list.as_slice(), '[', ']')?
            }
            (TypeTag::EmbeddedSet, Value::Set(set)) => {
                self.write_items(out, set.as_slice(), '<', '>')?
            }
            (tag, other) => return Err(RecordError::unsupported_type(tag, other.kind_name())),
        }
        Ok(())
    }

    fn write_items(&self, out: &mut String, items: &[Value], open: char, close: char) -> Result<()> {
        out.push(open);
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            self.write_value(out, item, None, Position::Nested)?;
        }
        out.push(close);
        Ok(())
    }

    /// Bytes are numbers with a `b` suffix; a one-char string travels as its code point
    fn write_byte(&self, out: &mut String, value: &Value) -> Result<()> {
        let byte = match value {
            Value::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => i8::try_from(u32::from(c))
                        .map_err(|_| RecordError::unsupported_type(TypeTag::Byte, "STRING"))?,
                    _ => return self.write_byte(out, self.conform(value, TypeTag::Byte)?.as_ref()),
                }
            }
            Value::Byte(b) => *b,
            other => match self.conform(other, TypeTag::Byte)?.as_ref() {
                Value::Byte(b) => *b,
                converted => {
                    return Err(RecordError::unsupported_type(
                        TypeTag::Byte,
                        converted.kind_name(),
                    ));
                }
            },
        };
        write_number(out, byte, TypeTag::Byte.suffix());
        Ok(())
    }

    /// Binary is base64, quoted at top level and wrapped in `_` when nested
    ///
    /// A single byte value at top level is written as a one-char string.
    fn write_binary(&self, out: &mut String, value: &Value, position: Position) -> Result<()> {
        if let Value::Byte(b) = value {
            let byte = u8::from_ne_bytes(b.to_ne_bytes());
            return match position {
                Position::TopLevel => {
                    write_quoted(out, &char::from(byte).to_string());
                    Ok(())
                }
                Position::Nested => {
                    write_base64(out, &[byte], position);
                    Ok(())
                }
            };
        }

        let value = self.conform(value, TypeTag::Binary)?;
        match value.as_ref() {
            Value::Binary(bytes) => {
                write_base64(out, bytes, position);
                Ok(())
            }
            other => Err(RecordError::unsupported_type(TypeTag::Binary, other.kind_name())),
        }
    }
}

/// Class names are written bare, so they must read back as one
fn check_class_name(class_name: &str) -> Result<()> {
    match class_name.char_indices().find(|(_, c)| !is_class_char(*c)) {
        None if !class_name.is_empty() => Ok(()),
        found => Err(RecordError::malformed_literal(
            "class name cannot be written in record form",
            class_name,
            found.map_or(0, |(offset, _)| offset),
        )),
    }
}

fn write_name(out: &mut String, name: &str) {
    if is_bare_name(name) {
        out.push_str(name);
    } else {
        write_quoted(out, name);
    }
}

fn write_number(out: &mut String, n: impl std::fmt::Display, suffix: Option<char>) {
    let _ = write!(out, "{n}");
    if let Some(suffix) = suffix {
        out.push(suffix);
    }
}

fn write_base64(out: &mut String, bytes: &[u8], position: Position) {
    let delimiter = match position {
        Position::TopLevel => '"',
        Position::Nested => '_',
    };
    out.push(delimiter);
    BASE64.encode_string(bytes, out);
    out.push(delimiter);
}
