//! Generic value conversion between type tags

use crate::{CollectionFlavor, DateFormats, OwnerRef, TrackedList, TrackedSet, TypeTag, Value};
use chrono::DateTime;
use docrec_diagnostics::{RecordError, Result};

/// Convert a value to the kind named by `target`
///
/// Covers numeric widening and checked narrowing (floats truncate toward
/// zero), string and number parsing, boolean to and from integers, dates as
/// epoch milliseconds, and the textual form of any scalar. Null converts to
/// null. Anything else is a [`RecordError::TypeMismatch`].
pub fn convert(value: Value, target: TypeTag, formats: &DateFormats) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    if value.kind_of() == Some(target) && !matches!(value, Value::Enum(_)) {
        return Ok(value);
    }

    let converted = match target {
        TypeTag::Boolean => to_boolean(&value),
        TypeTag::Byte => integral(&value).and_then(|n| i8::try_from(n).ok()).map(Value::Byte),
        TypeTag::Short => integral(&value).and_then(|n| i16::try_from(n).ok()).map(Value::Short),
        TypeTag::Integer => integral(&value)
            .and_then(|n| i32::try_from(n).ok())
            .map(Value::Integer),
        TypeTag::Long => integral(&value).map(Value::Long),
        TypeTag::Float => floating(&value).and_then(narrow_float).map(Value::Float),
        TypeTag::Double => floating(&value).map(Value::Double),
        TypeTag::String => text(&value, formats).map(Value::String),
        TypeTag::Date => return to_date(value, formats),
        TypeTag::Binary => match &value {
            Value::Byte(b) => Some(Value::Binary(vec![b.to_ne_bytes()[0]])),
            Value::String(s) => Some(Value::Binary(s.as_bytes().to_vec())),
            _ => None,
        },
        TypeTag::Link => match &value {
            Value::String(s) => s.parse().ok().map(Value::Link),
            Value::Embedded(doc) => Some(Value::Link(doc.identity())),
            _ => None,
        },
        TypeTag::EmbeddedMap => match &value {
            Value::Embedded(doc) => Some(Value::map(
                doc.fields().map(|(name, v)| (name, v.clone())),
            )),
            _ => None,
        },
        TypeTag::EmbeddedList | TypeTag::EmbeddedSet => {
            return Ok(to_collection(value, target, None));
        }
        TypeTag::Embedded => None,
    };

    converted.ok_or_else(|| RecordError::type_mismatch(target, value.kind_name(), &value))
}

/// Build a list or set from any value
///
/// Collections contribute all their elements, maps their values in iteration
/// order, a non-empty string its comma-separated tokens, and any other value
/// becomes a single element. The lazy flavor of a source collection or map is
/// carried over.
pub fn to_collection(value: Value, target: TypeTag, owner: Option<&OwnerRef>) -> Value {
    match (value, target) {
        (Value::List(list), TypeTag::EmbeddedList) => Value::List(list),
        (Value::Set(set), TypeTag::EmbeddedSet) => Value::Set(set),
        (value, target) => {
            let flavor = match &value {
                Value::List(list) => list.flavor(),
                Value::Set(set) => set.flavor(),
                Value::Map(map) => map.flavor(),
                _ => CollectionFlavor::Tracked,
            };
            let items: Vec<Value> = match value {
                Value::List(list) => list.into_vec(),
                Value::Set(set) => set.into_vec(),
                Value::Map(map) => map.into_values().collect(),
                Value::String(s) if s.is_empty() => Vec::new(),
                Value::String(s) => s.split(',').map(Value::string).collect(),
                other => vec![other],
            };

            if target == TypeTag::EmbeddedSet {
                let mut set = TrackedSet::with_flavor(flavor);
                set.set_owner(owner.cloned());
                set.extend(items);
                set.mark_clean();
                Value::Set(set)
            } else {
                let mut list = TrackedList::with_flavor(flavor);
                list.set_owner(owner.cloned());
                list.extend(items);
                list.mark_clean();
                Value::List(list)
            }
        }
    }
}

fn to_boolean(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("true") {
                Some(Value::Boolean(true))
            } else if s.eq_ignore_ascii_case("false") {
                Some(Value::Boolean(false))
            } else {
                None
            }
        }
        other => integral(other).map(|n| Value::Boolean(n != 0)),
    }
}

fn integral(value: &Value) -> Option<i64> {
    match value {
        Value::Boolean(b) => Some(i64::from(*b)),
        Value::Float(n) => truncate(f64::from(*n)),
        Value::Double(n) => truncate(*n),
        Value::String(s) => s.trim().parse().ok(),
        Value::Date(dt) => Some(dt.timestamp_millis()),
        Value::Enum(e) => Some(i64::from(e.ordinal)),
        other => other.as_i64(),
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn truncate(n: f64) -> Option<i64> {
    (n.is_finite() && n >= i64::MIN as f64 && n < i64::MAX as f64).then(|| n.trunc() as i64)
}

#[allow(clippy::cast_precision_loss)]
fn floating(value: &Value) -> Option<f64> {
    match value {
        Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Date(dt) => Some(dt.timestamp_millis() as f64),
        Value::Enum(e) => Some(f64::from(e.ordinal)),
        other => other.as_f64(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn narrow_float(n: f64) -> Option<f32> {
    if n.is_finite() && n.abs() > f64::from(f32::MAX) {
        return None;
    }
    Some(n as f32)
}

fn text(value: &Value, formats: &DateFormats) -> Option<String> {
    Some(match value {
        Value::Boolean(b) => b.to_string(),
        Value::Byte(n) => n.to_string(),
        Value::Short(n) => n.to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Long(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::Double(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Enum(e) => e.name.clone(),
        Value::Date(dt) => formats.format(dt),
        Value::Link(rid) => rid.to_string(),
        _ => return None,
    })
}

fn to_date(value: Value, formats: &DateFormats) -> Result<Value> {
    match &value {
        Value::String(s) => formats.parse(s).map(Value::date),
        Value::Float(_) | Value::Double(_) | Value::Byte(_) | Value::Short(_) => {
            integral(&value)
                .and_then(DateTime::from_timestamp_millis)
                .map(Value::date)
                .ok_or_else(|| RecordError::type_mismatch(TypeTag::Date, value.kind_name(), &value))
        }
        Value::Integer(n) => date_or_mismatch(i64::from(*n), &value),
        Value::Long(n) => date_or_mismatch(*n, &value),
        _ => Err(RecordError::type_mismatch(
            TypeTag::Date,
            value.kind_name(),
            &value,
        )),
    }
}

fn date_or_mismatch(millis: i64, value: &Value) -> Result<Value> {
    DateTime::from_timestamp_millis(millis)
        .map(Value::date)
        .ok_or_else(|| RecordError::type_mismatch(TypeTag::Date, value.kind_name(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EnumConstant;
    use pretty_assertions::assert_eq;

    fn conv(value: Value, target: TypeTag) -> Result<Value> {
        convert(value, target, &DateFormats::default())
    }

    #[test]
    fn test_numeric_widening_and_narrowing() {
        assert_eq!(conv(Value::Short(7), TypeTag::Long), Ok(Value::Long(7)));
        assert_eq!(conv(Value::Long(300), TypeTag::Short), Ok(Value::Short(300)));
        assert!(conv(Value::Long(300), TypeTag::Byte).is_err());
        assert_eq!(conv(Value::Double(-2.9), TypeTag::Integer), Ok(Value::Integer(-2)));
        assert!(conv(Value::Double(f64::NAN), TypeTag::Integer).is_err());
    }

    #[test]
    fn test_string_parsing() {
        assert_eq!(conv(Value::string(" 42 "), TypeTag::Integer), Ok(Value::Integer(42)));
        assert_eq!(conv(Value::string("2.5"), TypeTag::Double), Ok(Value::Double(2.5)));
        assert_eq!(conv(Value::string("TRUE"), TypeTag::Boolean), Ok(Value::Boolean(true)));
        assert!(conv(Value::string("yes"), TypeTag::Boolean).is_err());
        assert!(conv(Value::string("4.2"), TypeTag::Integer).is_err());
    }

    #[test]
    fn test_boolean_integer_round_trip() {
        assert_eq!(conv(Value::Boolean(true), TypeTag::Integer), Ok(Value::Integer(1)));
        assert_eq!(conv(Value::Integer(0), TypeTag::Boolean), Ok(Value::Boolean(false)));
    }

    #[test]
    fn test_enum_to_string_uses_name() {
        let value = Value::Enum(EnumConstant::new("Color", "RED", 2));
        assert_eq!(conv(value.clone(), TypeTag::String), Ok(Value::string("RED")));
        assert_eq!(conv(value, TypeTag::Long), Ok(Value::Long(2)));
    }

    #[test]
    fn test_dates_as_millis() {
        let date = Value::date_millis(1_000).unwrap_or_default();
        assert_eq!(conv(date.clone(), TypeTag::Long), Ok(Value::Long(1_000)));
        assert_eq!(conv(Value::Long(1_000), TypeTag::Date), Ok(date.clone()));
        assert_eq!(
            conv(date, TypeTag::String),
            Ok(Value::string("1970-01-01 00:00:01"))
        );
    }

    #[test]
    fn test_mismatch_reports_kinds() {
        let err = conv(Value::list([]), TypeTag::Integer);
        assert_eq!(
            err,
            Err(RecordError::type_mismatch("INTEGER", "EMBEDDEDLIST", "[]"))
        );
    }

    #[test]
    fn test_to_collection_from_string() {
        let set = to_collection(Value::string("a,b,a"), TypeTag::EmbeddedSet, None);
        assert_eq!(set, Value::set([Value::string("a"), Value::string("b")]));
        assert_eq!(
            to_collection(Value::string(""), TypeTag::EmbeddedList, None),
            Value::list([])
        );
    }
}
