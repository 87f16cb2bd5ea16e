//! Bracket indexing
//!
//! The meaning of `[...]` depends on the value it applies to:
//! - documents and maps: a field or key, or several separated by commas
//! - lists, sets and binary: positions, an inclusive `from-to` range, or a
//!   `field = literal` filter over embedded documents
//! - anything else: null

use crate::resolver::PathResolver;
use docrec_codec::infer_value;
use docrec_diagnostics::{RecordError, Result, Span};
use docrec_types::{Document, TrackedMap, Value};
use smallvec::SmallVec;
use std::borrow::Cow;

type Parts<'a> = SmallVec<[&'a str; 4]>;

impl PathResolver<'_, '_> {
    pub(crate) fn index(&self, base: Value, content: &str, path: &str, span: Span) -> Result<Value> {
        match &base {
            Value::Embedded(document) => Ok(by_name(content, |name| document_field(document, name))),
            Value::Map(map) => Ok(by_name(content, |name| map_entry(map, name))),
            Value::List(_) | Value::Set(_) => {
                let elements = base.elements().unwrap_or_default();
                self.by_position(elements, content, path, span)
            }
            Value::Binary(bytes) => {
                let elements: Vec<Value> = bytes
                    .iter()
                    .map(|byte| Value::Byte(i8::from_ne_bytes([*byte])))
                    .collect();
                self.by_position(&elements, content, path, span)
            }
            _ => Ok(Value::Null),
        }
    }

    fn by_position(&self, elements: &[Value], content: &str, path: &str, span: Span) -> Result<Value> {
        let parts = smart_split(content, ',');
        if parts.len() > 1 {
            return parts
                .iter()
                .map(|part| element(elements, parse_index(part, path, span)?))
                .collect::<Result<Vec<_>>>()
                .map(Value::list);
        }

        if let Some((from, to)) = range(content) {
            if to < from {
                return Err(RecordError::malformed_path(
                    format!("range end {to} is before range start {from}"),
                    path,
                    span,
                ));
            }
            let start = position(elements, from)?;
            let end = position(elements, to)?;
            return Ok(Value::list(elements[start..=end].iter().cloned()));
        }

        if let Some((field, literal)) = condition(content) {
            return Ok(self.filter(elements, field, literal));
        }

        element(elements, parse_index(content, path, span)?)
    }

    /// Embedded documents whose `field`, converted to the literal's kind, equals it
    fn filter(&self, elements: &[Value], field: &str, literal: &str) -> Value {
        let expected = match unquote(literal) {
            Cow::Owned(text) => Value::String(text),
            Cow::Borrowed(text) => infer_value(text),
        };
        let Some(kind) = expected.kind_of() else {
            return Value::Null;
        };

        let mut matches: Vec<Value> = elements
            .iter()
            .filter(|element| {
                let Value::Embedded(document) = element else {
                    return false;
                };
                match document.field(field) {
                    None | Some(Value::Null) => false,
                    Some(value) => self
                        .codec()
                        .coercer()
                        .convert(value.clone(), kind)
                        .is_ok_and(|converted| converted == expected),
                }
            })
            .cloned()
            .collect();

        log::trace!("filter {field} = {literal} matched {} elements", matches.len());
        match matches.len() {
            0 => Value::Null,
            1 => matches.pop().unwrap_or_default(),
            _ => Value::list(matches),
        }
    }
}

fn by_name(content: &str, lookup: impl Fn(&str) -> Value) -> Value {
    let parts = smart_split(content, ',');
    if parts.len() == 1 {
        return lookup(unquote(parts[0]).as_ref());
    }
    Value::list(parts.iter().map(|part| lookup(unquote(part).as_ref())))
}

fn document_field(document: &Document, name: &str) -> Value {
    document.field(name).cloned().unwrap_or_default()
}

fn map_entry(map: &TrackedMap, key: &str) -> Value {
    map.get(key).cloned().unwrap_or_default()
}

fn parse_index(text: &str, path: &str, span: Span) -> Result<i64> {
    text.trim().parse::<i64>().map_err(|_| {
        RecordError::malformed_path(format!("index '{}' is not an integer", text.trim()), path, span)
    })
}

fn position(elements: &[Value], index: i64) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&position| position < elements.len())
        .ok_or_else(|| RecordError::index_out_of_range(index, elements.len()))
}

fn element(elements: &[Value], index: i64) -> Result<Value> {
    Ok(elements[position(elements, index)?].clone())
}

/// `a-b` where both sides are integers
fn range(content: &str) -> Option<(i64, i64)> {
    let parts = smart_split(content, '-');
    match parts.as_slice() {
        [from, to] => Some((from.parse().ok()?, to.parse().ok()?)),
        _ => None,
    }
}

/// `field = literal`
fn condition(content: &str) -> Option<(&str, &str)> {
    let parts = smart_split(content, '=');
    match parts.as_slice() {
        [field, literal] if !field.is_empty() => Some((*field, *literal)),
        _ => None,
    }
}

/// Split on `separator` outside quotes and brackets, trimming each part
fn smart_split(text: &str, separator: char) -> Parts<'_> {
    let mut parts = Parts::new();
    let mut quote = None;
    let mut depth = 0usize;
    let mut start = 0;

    for (offset, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[' | '(' | '{') => depth += 1,
            (None, ']' | ')' | '}') => depth = depth.saturating_sub(1),
            (None, c) if c == separator && depth == 0 => {
                parts.push(text[start..offset].trim());
                start = offset + c.len_utf8();
            }
            (None, _) => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}

/// Remove one level of matching single or double quotes
fn unquote(text: &str) -> Cow<'_, str> {
    let text = text.trim();
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return Cow::Owned(text[1..text.len() - 1].to_owned());
        }
    }
    Cow::Borrowed(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smart_split_respects_quotes() {
        assert_eq!(
            smart_split("a, 'b,c' ,d", ',').as_slice(),
            &["a", "'b,c'", "d"]
        );
        assert_eq!(smart_split("x", ',').as_slice(), &["x"]);
    }

    #[test]
    fn test_range_requires_two_integers() {
        assert_eq!(range("1-3"), Some((1, 3)));
        assert_eq!(range(" 2 - 4 "), Some((2, 4)));
        assert_eq!(range("-1"), None);
        assert_eq!(range("a-b"), None);
        assert_eq!(range("1-2-3"), None);
    }

    #[test]
    fn test_condition_split() {
        assert_eq!(condition("name = 'Ann'"), Some(("name", "'Ann'")));
        assert_eq!(condition("name='a=b'"), Some(("name", "'a=b'")));
        assert_eq!(condition("3"), None);
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'a'"), "a");
        assert_eq!(unquote("\"a\""), "a");
        assert_eq!(unquote("a"), "a");
        assert_eq!(unquote("'"), "'");
    }
}
