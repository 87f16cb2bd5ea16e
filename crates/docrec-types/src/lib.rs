//! Value model and type coercion
//!
//! This crate defines the in-memory shape of schema-less records:
//! - Field values ([`Value`]) and the semantic type tags they carry
//! - Documents with identity, class, ordered fields and change tracking
//! - Owner-tracked lists, sets and maps
//! - Coercion of values to declared types and generic conversion
//! - Date format configuration

mod coercion;
mod collections;
mod compare;
mod config;
mod convert;
mod document;
mod record_id;
mod type_tag;
mod value;

pub use coercion::{CoercionTarget, TypeCoercer, coerce};
pub use collections::{
    CollectionFlavor, DocumentHandle, OwnerRef, TrackedList, TrackedMap, TrackedSet,
};
pub use compare::{compare_values, values_equal};
pub use config::{DateFormats, parse_with_pattern, to_chrono_pattern};
pub use convert::{convert, to_collection};
pub use document::{Document, LoadStatus, same_content};
pub use record_id::RecordId;
pub use type_tag::TypeTag;
pub use value::{EnumConstant, Value};
