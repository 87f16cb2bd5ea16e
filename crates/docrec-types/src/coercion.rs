//! Type coercion rules
//!
//! Coercion turns a field value into the shape a declared type expects. The
//! rules are tried in priority order:
//! 1. Reference targets (`Link`, or a whole record) accept links, record id
//!    strings and embedded documents
//! 2. List and set targets collect elements from any value
//! 3. Enum constants become their ordinal or their name
//! 4. Date targets parse strings with the configured patterns
//! 5. Everything else goes through [`convert`]

use crate::convert::{convert, to_collection};
use crate::{DateFormats, OwnerRef, RecordId, TypeTag, Value};
use docrec_diagnostics::{RecordError, Result};
use std::fmt;

/// What a value is coerced to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoercionTarget {
    /// A record: an embedded document stays as-is, anything else must name one
    Record,
    Type(TypeTag),
}

impl From<TypeTag> for CoercionTarget {
    fn from(tag: TypeTag) -> Self {
        Self::Type(tag)
    }
}

impl fmt::Display for CoercionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record => write!(f, "RECORD"),
            Self::Type(tag) => write!(f, "{tag}"),
        }
    }
}

/// Applies coercion rules with an explicit date configuration
#[derive(Debug, Clone, Default)]
pub struct TypeCoercer {
    formats: DateFormats,
}

impl TypeCoercer {
    pub fn new(formats: DateFormats) -> Self {
        Self { formats }
    }

    pub fn formats(&self) -> &DateFormats {
        &self.formats
    }

    /// Coerce a value; collections created here have no owner
    pub fn coerce(&self, value: Value, target: impl Into<CoercionTarget>) -> Result<Value> {
        self.coerce_owned(value, target.into(), None)
    }

    /// Coerce a value that will be stored under `owner`
    pub fn coerce_for(
        &self,
        value: Value,
        target: impl Into<CoercionTarget>,
        owner: &OwnerRef,
    ) -> Result<Value> {
        self.coerce_owned(value, target.into(), Some(owner))
    }

    /// Generic conversion without the structural rules
    pub fn convert(&self, value: Value, target: TypeTag) -> Result<Value> {
        convert(value, target, &self.formats)
    }

    fn coerce_owned(
        &self,
        value: Value,
        target: CoercionTarget,
        owner: Option<&OwnerRef>,
    ) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        log::trace!("coercing {} value to {}", value.kind_name(), target);

        let tag = match target {
            CoercionTarget::Record => return to_reference(value, target),
            CoercionTarget::Type(TypeTag::Link) => return to_reference(value, target),
            CoercionTarget::Type(tag) => tag,
        };

        match (value, tag) {
            (value, TypeTag::EmbeddedList | TypeTag::EmbeddedSet) => {
                Ok(to_collection(value, tag, owner))
            }
            (Value::Enum(constant), tag) => {
                if tag.is_numeric() {
                    convert(Value::Long(i64::from(constant.ordinal)), tag, &self.formats)
                } else if tag == TypeTag::String {
                    Ok(Value::String(constant.name))
                } else {
                    Err(RecordError::type_mismatch(
                        tag,
                        "ENUM",
                        constant.name,
                    ))
                }
            }
            (Value::String(s), TypeTag::Date) => self.formats.parse(&s).map(Value::date),
            (value, tag) => convert(value, tag, &self.formats),
        }
    }
}

fn to_reference(value: Value, target: CoercionTarget) -> Result<Value> {
    match value {
        Value::Link(rid) => Ok(Value::Link(rid)),
        Value::String(s) => s
            .parse::<RecordId>()
            .map(Value::Link)
            .map_err(|_| RecordError::type_mismatch(target, "STRING", s)),
        Value::Embedded(doc) => match target {
            CoercionTarget::Record => Ok(Value::Embedded(doc)),
            CoercionTarget::Type(_) => Ok(Value::Link(doc.identity())),
        },
        other => Err(RecordError::type_mismatch(target, other.kind_name(), &other)),
    }
}

/// Coerce with the default date formats
pub fn coerce(value: Value, target: impl Into<CoercionTarget>) -> Result<Value> {
    TypeCoercer::default().coerce(value, target)
}
