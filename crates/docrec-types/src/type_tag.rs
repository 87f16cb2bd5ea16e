//! Semantic type tags carried on the wire and declared by schemas

use docrec_diagnostics::RecordError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of semantic types a field value can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TypeTag {
    Boolean,
    /// 32-bit signed integer
    Integer,
    /// 16-bit signed integer
    Short,
    /// 64-bit signed integer
    Long,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// 8-bit signed integer
    Byte,
    String,
    Binary,
    /// Instant with millisecond precision
    Date,
    /// Non-owning reference to another record
    Link,
    /// Nested document
    Embedded,
    /// String-keyed map
    EmbeddedMap,
    /// Ordered list
    EmbeddedList,
    /// Set unique by value equality
    EmbeddedSet,
}

impl TypeTag {
    /// All tags, in declaration order
    pub const ALL: [TypeTag; 15] = [
        Self::Boolean,
        Self::Integer,
        Self::Short,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Byte,
        Self::String,
        Self::Binary,
        Self::Date,
        Self::Link,
        Self::Embedded,
        Self::EmbeddedMap,
        Self::EmbeddedList,
        Self::EmbeddedSet,
    ];

    /// Upper-case name used in messages and configuration
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Integer => "INTEGER",
            Self::Short => "SHORT",
            Self::Long => "LONG",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Byte => "BYTE",
            Self::String => "STRING",
            Self::Binary => "BINARY",
            Self::Date => "DATE",
            Self::Link => "LINK",
            Self::Embedded => "EMBEDDED",
            Self::EmbeddedMap => "EMBEDDEDMAP",
            Self::EmbeddedList => "EMBEDDEDLIST",
            Self::EmbeddedSet => "EMBEDDEDSET",
        }
    }

    /// Wire suffix that terminates a numeric literal of this type
    pub const fn suffix(&self) -> Option<char> {
        match self {
            Self::Float => Some('f'),
            Self::Long => Some('l'),
            Self::Double => Some('d'),
            Self::Short => Some('s'),
            Self::Byte => Some('b'),
            Self::Date => Some('t'),
            _ => None,
        }
    }

    /// Tag selected by a literal suffix
    pub const fn from_suffix(c: char) -> Option<TypeTag> {
        match c {
            'f' => Some(Self::Float),
            'l' => Some(Self::Long),
            'd' => Some(Self::Double),
            's' => Some(Self::Short),
            'b' => Some(Self::Byte),
            't' => Some(Self::Date),
            _ => None,
        }
    }

    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Integer | Self::Short | Self::Long | Self::Float | Self::Double | Self::Byte
        )
    }

    pub const fn is_integral(&self) -> bool {
        matches!(self, Self::Integer | Self::Short | Self::Long | Self::Byte)
    }

    /// Tags whose values nest other values
    pub const fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::Embedded | Self::EmbeddedMap | Self::EmbeddedList | Self::EmbeddedSet
        )
    }

    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::EmbeddedList | Self::EmbeddedSet)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|tag| tag.name().eq_ignore_ascii_case(wanted))
            .or_else(|| match wanted.to_ascii_lowercase().as_str() {
                "bool" => Some(Self::Boolean),
                "int" => Some(Self::Integer),
                "map" => Some(Self::EmbeddedMap),
                "list" => Some(Self::EmbeddedList),
                "set" => Some(Self::EmbeddedSet),
                _ => None,
            })
            .ok_or_else(|| RecordError::config(format!("unknown type tag '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&TypeTag::EmbeddedSet).unwrap(),
            r#""EMBEDDEDSET""#
        );
        let tag: TypeTag = serde_json::from_str(r#""LINK""#).unwrap();
        assert_eq!(tag, TypeTag::Link);
    }

    #[test]
    fn test_suffix_alphabet_is_bijective() {
        for tag in TypeTag::ALL {
            if let Some(c) = tag.suffix() {
                assert_eq!(TypeTag::from_suffix(c), Some(tag));
            }
        }
        assert_eq!(TypeTag::from_suffix('x'), None);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("long".parse::<TypeTag>().ok(), Some(TypeTag::Long));
        assert_eq!("EmbeddedMap".parse::<TypeTag>().ok(), Some(TypeTag::EmbeddedMap));
        assert_eq!("set".parse::<TypeTag>().ok(), Some(TypeTag::EmbeddedSet));
        assert!("decimal".parse::<TypeTag>().is_err());
    }
}
