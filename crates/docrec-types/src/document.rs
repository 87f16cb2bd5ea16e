//! Documents: ordered field maps with identity, class and change tracking

use crate::{DocumentHandle, OwnerRef, RecordId, TrackedList, TrackedMap, TrackedSet, Value};
use chrono::SubsecRound;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Whether a document's fields are present in memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadStatus {
    #[default]
    Loaded,
    /// Only the identity is known; fields must be fetched through a loader
    NotLoaded,
}

/// A schema-less record
///
/// Field names are unique and keep insertion order. Collections stored in a
/// field are stamped with an [`OwnerRef`] naming this document and the field,
/// and their modification flags feed [`Document::is_dirty`].
///
/// `Clone` produces a snapshot that shares the handle of the original; use
/// [`Document::copy`] for an independent document.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    #[serde(skip)]
    handle: DocumentHandle,
    identity: RecordId,
    version: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    class_name: Option<String>,
    fields: IndexMap<String, Value>,
    #[serde(skip)]
    status: LoadStatus,
    #[serde(skip)]
    dirty: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            handle: DocumentHandle::next(),
            identity: RecordId::NEW,
            version: 0,
            class_name: None,
            fields: IndexMap::new(),
            status: LoadStatus::Loaded,
            dirty: false,
        }
    }

    pub fn with_class(class_name: impl Into<String>) -> Self {
        let mut doc = Self::new();
        doc.class_name = Some(class_name.into());
        doc
    }

    /// A placeholder for a stored record whose fields are not loaded yet
    pub fn unloaded(identity: RecordId) -> Self {
        let mut doc = Self::new();
        doc.identity = identity;
        doc.status = LoadStatus::NotLoaded;
        doc
    }

    pub fn with_identity(mut self, identity: RecordId) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    /// Builder form of [`Document::set_field`]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn handle(&self) -> DocumentHandle {
        self.handle
    }

    pub fn identity(&self) -> RecordId {
        self.identity
    }

    pub fn set_identity(&mut self, identity: RecordId) {
        self.identity = identity;
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn set_class_name(&mut self, class_name: Option<String>) {
        if self.class_name != class_name {
            self.class_name = class_name;
            self.dirty = true;
        }
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn is_loaded(&self) -> bool {
        self.status == LoadStatus::Loaded
    }

    pub fn set_status(&mut self, status: LoadStatus) {
        self.status = status;
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Mutable access to a field; the document is marked dirty
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        let value = self.fields.get_mut(name)?;
        self.dirty = true;
        Some(value)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Set a field, adopting any collections in the value
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let mut value = value.into();
        adopt(&mut value, &OwnerRef::new(self.handle, name.clone()));
        self.dirty = true;
        self.fields.insert(name, value)
    }

    pub fn remove_field(&mut self, name: &str) -> Option<Value> {
        let removed = self.fields.shift_remove(name);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    /// Swap in a complete field map at once
    pub fn replace_fields(&mut self, fields: IndexMap<String, Value>) {
        self.fields = fields;
        let handle = self.handle;
        for (name, value) in &mut self.fields {
            adopt(value, &OwnerRef::new(handle, name.clone()));
        }
        self.dirty = true;
    }

    /// Record that a collection owned by this document changed
    ///
    /// Returns false when `owner` names another document.
    pub fn notify_owner(&mut self, owner: &OwnerRef) -> bool {
        if owner.handle != self.handle {
            return false;
        }
        log::trace!(
            "document {} notified of change in {:?}",
            self.identity,
            owner.field
        );
        self.dirty = true;
        true
    }

    /// True when a field changed or an owned collection was modified
    pub fn is_dirty(&self) -> bool {
        self.dirty || self.fields.values().any(value_modified)
    }

    /// Clear the dirty flag and the modification flags of owned collections
    pub fn mark_clean(&mut self) {
        self.dirty = false;
        for value in self.fields.values_mut() {
            clean_value(value);
        }
    }

    /// Deep comparison of field contents, ignoring identity and version
    pub fn has_same_content(&self, other: &Document) -> bool {
        self.class_name == other.class_name
            && self.fields.len() == other.fields.len()
            && self.fields.iter().all(|(name, value)| {
                other
                    .fields
                    .get(name)
                    .is_some_and(|theirs| same_content(value, theirs))
            })
    }

    /// Independent deep copy with a fresh handle
    ///
    /// Identity, version and class are kept. Every collection is re-owned by
    /// the copy and keeps its flavor; embedded documents are copied too.
    pub fn copy(&self) -> Document {
        let mut copy = Document {
            handle: DocumentHandle::next(),
            identity: self.identity,
            version: self.version,
            class_name: self.class_name.clone(),
            fields: IndexMap::with_capacity(self.fields.len()),
            status: self.status,
            dirty: self.dirty,
        };
        for (name, value) in &self.fields {
            let owner = OwnerRef::new(copy.handle, name.clone());
            copy.fields.insert(name.clone(), copy_value(value, &owner));
        }
        copy
    }
}

fn adopt(value: &mut Value, owner: &OwnerRef) {
    match value {
        Value::List(list) => {
            list.set_owner(Some(owner.clone()));
            list.items_mut().iter_mut().for_each(|v| adopt(v, owner));
        }
        Value::Set(set) => {
            set.set_owner(Some(owner.clone()));
            set.items_mut().iter_mut().for_each(|v| adopt(v, owner));
        }
        Value::Map(map) => {
            map.set_owner(Some(owner.clone()));
            map.values_mut().for_each(|v| adopt(v, owner));
        }
        Value::Date(instant) => *instant = instant.trunc_subsecs(3),
        _ => {}
    }
}

fn value_modified(value: &Value) -> bool {
    match value {
        Value::List(list) => list.is_modified() || list.iter().any(value_modified),
        Value::Set(set) => set.is_modified() || set.iter().any(value_modified),
        Value::Map(map) => map.is_modified() || map.values().any(value_modified),
        _ => false,
    }
}

fn clean_value(value: &mut Value) {
    match value {
        Value::List(list) => {
            list.mark_clean();
            list.items_mut().iter_mut().for_each(clean_value);
        }
        Value::Set(set) => {
            set.mark_clean();
            set.items_mut().iter_mut().for_each(clean_value);
        }
        Value::Map(map) => {
            map.mark_clean();
            map.values_mut().for_each(clean_value);
        }
        _ => {}
    }
}

fn copy_value(value: &Value, owner: &OwnerRef) -> Value {
    match value {
        Value::Embedded(doc) => Value::embedded(doc.copy()),
        Value::List(list) => {
            let mut copy = TrackedList::with_flavor(list.flavor()).owned_by(owner.clone());
            copy.items_mut()
                .extend(list.iter().map(|v| copy_value(v, owner)));
            Value::List(copy)
        }
        Value::Set(set) => {
            let mut copy = TrackedSet::with_flavor(set.flavor()).owned_by(owner.clone());
            copy.items_mut()
                .extend(set.iter().map(|v| copy_value(v, owner)));
            Value::Set(copy)
        }
        Value::Map(map) => {
            let mut copy = TrackedMap::with_flavor(map.flavor()).owned_by(owner.clone());
            for (key, v) in map.iter() {
                copy.insert(key, copy_value(v, owner));
            }
            copy.mark_clean();
            Value::Map(copy)
        }
        other => other.clone(),
    }
}

/// Field value comparison used by [`Document::has_same_content`]
pub fn same_content(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Embedded(x), Value::Embedded(y)) => x.has_same_content(y),
        (Value::Link(rid), Value::Embedded(doc)) | (Value::Embedded(doc), Value::Link(rid)) => {
            doc.identity() == *rid
        }
        (Value::List(x), Value::List(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(l, r)| same_content(l, r))
        }
        (Value::Set(x), Value::Set(y)) => {
            x.len() == y.len() && x.iter().all(|l| y.iter().any(|r| same_content(l, r)))
        }
        (Value::Map(x), Value::Map(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|theirs| same_content(v, theirs)))
        }
        (x, y) => x == y,
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
            && self.class_name == other.class_name
            && self.fields == other.fields
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(class_name) = &self.class_name {
            write!(f, "{class_name}")?;
        }
        if self.identity.is_persistent() {
            write!(f, "{}", self.identity)?;
        }
        if !self.is_loaded() {
            return write!(f, "{{...}}");
        }
        write!(f, "{{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CollectionFlavor;

    #[test]
    fn test_fields_keep_insertion_order() {
        let doc = Document::new()
            .with_field("b", 1)
            .with_field("a", 2)
            .with_field("b", 3);
        assert_eq!(doc.field_names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(doc.field("b"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_set_field_truncates_dates() {
        let nanos = chrono::DateTime::from_timestamp(10, 999_999).unwrap();
        let doc = Document::new().with_field(
            "seen",
            Value::list([Value::Date(nanos)]),
        );
        let Some(Value::List(list)) = doc.field("seen") else {
            panic!("expected list");
        };
        assert_eq!(list.as_slice(), &[Value::date_millis(10_000).unwrap()]);
    }

    #[test]
    fn test_set_field_adopts_collections() {
        let doc = Document::new().with_field("tags", Value::list([Value::string("x")]));
        let Some(Value::List(list)) = doc.field("tags") else {
            panic!("expected list");
        };
        assert_eq!(
            list.owner(),
            Some(&OwnerRef::new(doc.handle(), "tags"))
        );
    }

    #[test]
    fn test_collection_mutation_marks_owner_dirty() {
        let mut doc = Document::new().with_field("tags", Value::list([]));
        doc.mark_clean();
        assert!(!doc.is_dirty());

        if let Some(Value::List(list)) = doc.fields.get_mut("tags") {
            list.push(Value::Integer(1));
        }
        assert!(doc.is_dirty());

        doc.mark_clean();
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_notify_owner_checks_handle() {
        let mut doc = Document::new();
        doc.mark_clean();
        let stranger = OwnerRef::new(DocumentHandle::next(), "x");
        assert!(!doc.notify_owner(&stranger));
        assert!(!doc.is_dirty());
        assert!(doc.notify_owner(&OwnerRef::document(doc.handle())));
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_copy_reowns_collections_and_keeps_flavor() {
        let mut refs = TrackedList::with_flavor(CollectionFlavor::LazyRecords);
        refs.push(Value::Link(RecordId::new(3, 1)));
        let original = Document::new().with_field("refs", refs);
        let copy = original.copy();

        assert_ne!(copy.handle(), original.handle());
        let Some(Value::List(list)) = copy.field("refs") else {
            panic!("expected list");
        };
        assert!(list.is_lazy());
        assert_eq!(list.owner().map(|o| o.handle), Some(copy.handle()));
        assert!(copy.has_same_content(&original));
    }

    #[test]
    fn test_same_content_recurses_into_documents() {
        let inner = || Document::new().with_field("city", "Rome");
        let a = Document::new().with_field("address", inner());
        let b = Document::new()
            .with_identity(RecordId::new(1, 1))
            .with_field("address", inner());
        let c = Document::new().with_field("address", Document::new().with_field("city", "Oslo"));

        assert!(a.has_same_content(&b));
        assert!(!a.has_same_content(&c));
    }
}
