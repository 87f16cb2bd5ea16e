//! Runtime values stored in document fields

use crate::{Document, RecordId, TrackedList, TrackedMap, TrackedSet, TypeTag};
use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use std::fmt;

/// A member of a user-defined enumeration stored as a field value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EnumConstant {
    pub type_name: String,
    pub name: String,
    pub ordinal: u32,
}

impl EnumConstant {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>, ordinal: u32) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            ordinal,
        }
    }
}

/// A field value
///
/// Collections are heterogeneous. Equality is structural: sets compare
/// without regard to order, maps and documents compare by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Binary(Vec<u8>),
    /// Instant truncated to milliseconds
    Date(DateTime<Utc>),
    Link(RecordId),
    Enum(EnumConstant),
    Embedded(Box<Document>),
    List(TrackedList),
    Set(TrackedSet),
    Map(TrackedMap),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    pub fn embedded(document: Document) -> Self {
        Self::Embedded(Box::new(document))
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Self::List(items.into_iter().collect())
    }

    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Set(items.into_iter().collect())
    }

    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Map(entries.into_iter().collect())
    }

    /// Date truncated to millisecond precision
    pub fn date(instant: DateTime<Utc>) -> Self {
        Self::Date(instant.trunc_subsecs(3))
    }

    /// Date from epoch milliseconds
    pub fn date_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self::Date)
    }

    /// The semantic type of this value; `None` for null
    ///
    /// Enum constants report `String` since they travel by name.
    pub fn kind_of(&self) -> Option<TypeTag> {
        Some(match self {
            Self::Null => return None,
            Self::Boolean(_) => TypeTag::Boolean,
            Self::Byte(_) => TypeTag::Byte,
            Self::Short(_) => TypeTag::Short,
            Self::Integer(_) => TypeTag::Integer,
            Self::Long(_) => TypeTag::Long,
            Self::Float(_) => TypeTag::Float,
            Self::Double(_) => TypeTag::Double,
            Self::String(_) | Self::Enum(_) => TypeTag::String,
            Self::Binary(_) => TypeTag::Binary,
            Self::Date(_) => TypeTag::Date,
            Self::Link(_) => TypeTag::Link,
            Self::Embedded(_) => TypeTag::Embedded,
            Self::List(_) => TypeTag::EmbeddedList,
            Self::Set(_) => TypeTag::EmbeddedSet,
            Self::Map(_) => TypeTag::EmbeddedMap,
        })
    }

    /// Name of the value's kind for messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Enum(_) => "ENUM",
            other => other.kind_of().map_or("NULL", |tag| tag.name()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_numeric(&self) -> bool {
        self.kind_of().is_some_and(|tag| tag.is_numeric())
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::List(_) | Self::Set(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integral kinds widened to `i64`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Byte(n) => Some(i64::from(*n)),
            Self::Short(n) => Some(i64::from(*n)),
            Self::Integer(n) => Some(i64::from(*n)),
            Self::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Any numeric kind as `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(f64::from(*n)),
            Self::Double(n) => Some(*n),
            #[allow(clippy::cast_precision_loss)]
            other => other.as_i64().map(|n| n as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Enum(e) => Some(&e.name),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Self::Embedded(doc) => Some(doc),
            _ => None,
        }
    }

    /// Elements of a list or set, in iteration order
    pub fn elements(&self) -> Option<&[Value]> {
        match self {
            Self::List(list) => Some(list.as_slice()),
            Self::Set(set) => Some(set.as_slice()),
            _ => None,
        }
    }

    /// Equality where embedded documents compare by record identity only
    pub fn identity_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Embedded(a), Self::Embedded(b)) => a.identity() == b.identity(),
            (Self::Link(rid), Self::Embedded(doc)) | (Self::Embedded(doc), Self::Link(rid)) => {
                doc.identity() == *rid
            }
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.identity_eq(y))
            }
            (Self::Set(a), Self::Set(b)) => {
                a.len() == b.len() && a.iter().all(|x| b.iter().any(|y| x.identity_eq(y)))
            }
            (Self::Map(a), Self::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|other| v.identity_eq(other)))
            }
            (a, b) => a == b,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i8> for Value {
    fn from(n: i8) -> Self {
        Self::Byte(n)
    }
}

impl From<i16> for Value {
    fn from(n: i16) -> Self {
        Self::Short(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Long(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Self::Float(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Double(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Binary(bytes)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::date(dt)
    }
}

impl From<RecordId> for Value {
    fn from(rid: RecordId) -> Self {
        Self::Link(rid)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Self::embedded(doc)
    }
}

impl From<EnumConstant> for Value {
    fn from(e: EnumConstant) -> Self {
        Self::Enum(e)
    }
}

impl From<TrackedList> for Value {
    fn from(list: TrackedList) -> Self {
        Self::List(list)
    }
}

impl From<TrackedSet> for Value {
    fn from(set: TrackedSet) -> Self {
        Self::Set(set)
    }
}

impl From<TrackedMap> for Value {
    fn from(map: TrackedMap) -> Self {
        Self::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

fn write_joined<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Byte(n) => write!(f, "{n}"),
            Self::Short(n) => write!(f, "{n}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Long(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Double(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Self::Date(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            Self::Link(rid) => write!(f, "{rid}"),
            Self::Enum(e) => write!(f, "{}", e.name),
            Self::Embedded(doc) => write!(f, "{doc}"),
            Self::List(list) => {
                write!(f, "[")?;
                write_joined(f, list.iter())?;
                write!(f, "]")
            }
            Self::Set(set) => {
                write!(f, "<")?;
                write_joined(f, set.iter())?;
                write!(f, ">")
            }
            Self::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of() {
        assert_eq!(Value::Null.kind_of(), None);
        assert_eq!(Value::Short(1).kind_of(), Some(TypeTag::Short));
        assert_eq!(
            Value::Enum(EnumConstant::new("Color", "RED", 0)).kind_of(),
            Some(TypeTag::String)
        );
        assert_eq!(Value::set([]).kind_of(), Some(TypeTag::EmbeddedSet));
    }

    #[test]
    fn test_display() {
        let value = Value::list([Value::Integer(1), Value::string("a"), Value::Null]);
        assert_eq!(value.to_string(), "[1, \"a\", null]");

        let date = Value::date_millis(0).unwrap_or_default();
        assert_eq!(date.to_string(), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_dates_keep_milliseconds_only() {
        let nanos = DateTime::from_timestamp(1_705_276_800, 123_456_789).unwrap();
        assert_eq!(Value::from(nanos), Value::date_millis(1_705_276_800_123).unwrap());
    }

    #[test]
    fn test_identity_eq_compares_documents_by_identity() {
        let rid = RecordId::new(5, 2);
        let a = Document::new().with_identity(rid).with_field("x", 1);
        let b = Document::new().with_identity(rid).with_field("x", 2);

        assert!(Value::embedded(a.clone()).identity_eq(&Value::embedded(b.clone())));
        assert_ne!(Value::embedded(a), Value::embedded(b));
        assert!(Value::Link(rid).identity_eq(&Value::embedded(Document::new().with_identity(rid))));
    }

    #[test]
    fn test_widening_accessors() {
        assert_eq!(Value::Byte(-3).as_i64(), Some(-3));
        assert_eq!(Value::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::string("x").as_i64(), None);
    }
}
