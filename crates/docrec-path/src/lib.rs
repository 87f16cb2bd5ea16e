//! Field path resolution over document graphs
//!
//! Paths name a value reachable from a document:
//!
//! - `address.city`: descend through embedded documents and links
//! - `tags[0]`, `tags[0,2]`, `tags[1-3]`: positions, lists of positions and
//!   inclusive ranges over lists, sets and binary
//! - `employees[name = 'Ann']`: filter embedded documents by a field
//! - `address['city','zip']`: several fields or map keys at once
//! - `@rid`, `@class`, `@version`, `@size`, `@fields`, `@type`, `@this`:
//!   computed attributes
//!
//! Links and unloaded documents are materialized through a [`RecordLoader`].
//!
//! # Example
//!
//! ```
//! use docrec_path::resolve;
//! use docrec_types::{Document, Value};
//!
//! let address = Document::new().with_field("city", Value::string("Oslo"));
//! let person = Document::with_class("Person").with_field("address", Value::embedded(address));
//!
//! assert_eq!(resolve(&person, "address.city").unwrap(), Value::string("Oslo"));
//! assert_eq!(resolve(&person, "@class").unwrap(), Value::string("Person"));
//! ```

mod cursor;
mod index;
mod loader;
mod ops;
mod resolver;
mod sort;

pub use loader::{InMemoryLoader, NoLoader, RecordLoader};
pub use ops::{UnionAccumulator, contains, contains_matching, merge_unions, union};
pub use resolver::{
    ATTRIBUTE_CLASS, ATTRIBUTE_FIELDS, ATTRIBUTE_RID, ATTRIBUTE_SIZE, ATTRIBUTE_THIS,
    ATTRIBUTE_TYPE, ATTRIBUTE_VERSION, PathResolver, resolve,
};
pub use sort::{Direction, OrderBy, sort_documents};
