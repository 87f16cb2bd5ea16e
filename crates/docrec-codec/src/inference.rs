//! Literal type inference
//!
//! A single left-to-right scan classifies untagged literal text:
//! - double-quoted text is a string
//! - digits, a leading sign and decimal points keep the scan numeric
//! - the first other character ends the scan; one of `f l d s b t` names the
//!   type of the numeric prefix, anything else makes the literal a string
//! - reaching the end yields an integer, or a float if a decimal point was seen

use crate::escape::unescape;
use docrec_diagnostics::{RecordError, Result};
use docrec_types::{TypeTag, Value};

const DECIMAL_SEPARATOR: char = '.';
const QUOTE: char = '"';

enum Scan<'a> {
    Quoted(&'a str),
    Number {
        body: &'a str,
        tag: TypeTag,
        /// Byte offset of the suffix character, if any
        suffix_at: Option<usize>,
    },
    Text,
}

fn scan(text: &str) -> Scan<'_> {
    if text.len() > 1 && text.starts_with(QUOTE) && text.ends_with(QUOTE) {
        return Scan::Quoted(&text[1..text.len() - 1]);
    }

    let mut integer = true;
    for (index, c) in text.char_indices() {
        if c.is_ascii_digit() || (index == 0 && (c == '+' || c == '-')) {
            continue;
        }
        if c == DECIMAL_SEPARATOR {
            integer = false;
            continue;
        }
        if index > 0 {
            if let Some(tag) = TypeTag::from_suffix(c) {
                return Scan::Number {
                    body: &text[..index],
                    tag,
                    suffix_at: Some(index),
                };
            }
        }
        return Scan::Text;
    }

    Scan::Number {
        body: text,
        tag: if integer {
            TypeTag::Integer
        } else {
            TypeTag::Float
        },
        suffix_at: None,
    }
}

/// Infer the type tag of untagged literal text
///
/// Never fails; empty text is a string.
pub fn infer_type(text: &str) -> TypeTag {
    if text.is_empty() {
        return TypeTag::String;
    }
    match scan(text) {
        Scan::Quoted(_) | Scan::Text => TypeTag::String,
        Scan::Number { tag, .. } => tag,
    }
}

/// Parse untagged literal text, failing on unparsable numeric bodies
///
/// Quoted text is unwrapped and unescaped; other text that does not scan as
/// a number is returned as a string unchanged. Empty text is null.
pub fn parse_literal(text: &str) -> Result<Value> {
    if text.is_empty() {
        return Ok(Value::Null);
    }
    match scan(text) {
        Scan::Quoted(body) => unescape(body)
            .map(Value::String)
            .map_err(|(offset, message)| RecordError::malformed_literal(message, text, offset + 1)),
        Scan::Text => Ok(Value::string(text)),
        Scan::Number {
            body,
            tag,
            suffix_at,
        } => {
            if let Some(at) = suffix_at {
                if at + 1 < text.len() {
                    return Err(RecordError::malformed_literal(
                        "unexpected characters after type suffix",
                        text,
                        at + 1,
                    ));
                }
            }
            parse_number(body, tag).ok_or_else(|| {
                RecordError::malformed_literal(format!("invalid {tag} literal"), text, 0)
            })
        }
    }
}

/// Parse untagged literal text; never fails
///
/// Text whose numeric body cannot be parsed is returned as a string.
pub fn infer_value(text: &str) -> Value {
    parse_literal(text).unwrap_or_else(|err| {
        log::trace!("literal '{text}' kept as string: {err}");
        Value::string(text)
    })
}

/// Parse a numeric body (without suffix) as the given tag
pub fn parse_number(body: &str, tag: TypeTag) -> Option<Value> {
    match tag {
        TypeTag::Integer => body.parse().ok().map(Value::Integer),
        TypeTag::Long => body.parse().ok().map(Value::Long),
        TypeTag::Short => body.parse().ok().map(Value::Short),
        TypeTag::Byte => body.parse().ok().map(Value::Byte),
        TypeTag::Float => body.parse().ok().map(Value::Float),
        TypeTag::Double => body.parse().ok().map(Value::Double),
        TypeTag::Date => body.parse().ok().and_then(Value::date_millis),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_only_at_start() {
        assert_eq!(infer_type("-5"), TypeTag::Integer);
        assert_eq!(infer_type("5-5"), TypeTag::String);
    }

    #[test]
    fn test_suffix_at_start_is_text() {
        assert_eq!(infer_type("f"), TypeTag::String);
        assert_eq!(infer_value("l"), Value::string("l"));
    }

    #[test]
    fn test_trailing_text_after_suffix() {
        assert_eq!(infer_type("12lx"), TypeTag::Long);
        assert!(parse_literal("12lx").is_err());
        assert_eq!(infer_value("12lx"), Value::string("12lx"));
    }
}
