//! Loose equality and ordering across value kinds

use crate::Value;
use std::cmp::Ordering;

/// Equality used by query helpers: numbers compare by value across kinds,
/// enum constants match their name, links match documents with that identity
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (x, y) if x.is_numeric() && y.is_numeric() => {
            compare_values(x, y) == Some(Ordering::Equal)
        }
        (Value::Enum(e), Value::String(s)) | (Value::String(s), Value::Enum(e)) => e.name == *s,
        (Value::Link(rid), Value::Embedded(doc)) | (Value::Embedded(doc), Value::Link(rid)) => {
            doc.identity() == *rid
        }
        _ => a == b,
    }
}

/// Partial ordering of two values; `None` when the kinds are not comparable
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (x, y) if x.is_numeric() && y.is_numeric() => match (x.as_i64(), y.as_i64()) {
            (Some(l), Some(r)) => Some(l.cmp(&r)),
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
        },
        (Value::Boolean(l), Value::Boolean(r)) => Some(l.cmp(r)),
        (Value::Enum(l), Value::Enum(r)) if l.type_name == r.type_name => {
            Some(l.ordinal.cmp(&r.ordinal))
        }
        (Value::String(_) | Value::Enum(_), Value::String(_) | Value::Enum(_)) => {
            Some(a.as_str()?.cmp(b.as_str()?))
        }
        (Value::Date(l), Value::Date(r)) => Some(l.cmp(r)),
        (Value::Link(l), Value::Link(r)) => Some(l.cmp(r)),
        (Value::Binary(l), Value::Binary(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

impl Value {
    /// Partial ordering against another value, see [`compare_values`]
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        compare_values(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Document, EnumConstant, RecordId};

    #[test]
    fn test_numbers_compare_across_kinds() {
        assert!(values_equal(&Value::Integer(5), &Value::Long(5)));
        assert!(values_equal(&Value::Float(1.5), &Value::Double(1.5)));
        assert_eq!(
            compare_values(&Value::Short(2), &Value::Double(2.5)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_enum_matches_name() {
        let red = Value::Enum(EnumConstant::new("Color", "RED", 0));
        assert!(values_equal(&red, &Value::string("RED")));
        assert!(!values_equal(&red, &Value::string("BLUE")));
    }

    #[test]
    fn test_link_matches_document_identity() {
        let rid = RecordId::new(9, 4);
        let doc = Value::embedded(Document::new().with_identity(rid));
        assert!(values_equal(&Value::Link(rid), &doc));
    }

    #[test]
    fn test_incomparable_kinds() {
        assert_eq!(compare_values(&Value::Integer(1), &Value::string("1")), None);
        assert_eq!(compare_values(&Value::Boolean(true), &Value::Null), None);
        assert_eq!(Value::Long(3).compare(&Value::Integer(2)), Some(Ordering::Greater));
    }
}
