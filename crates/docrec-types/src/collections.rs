//! Owner-tracked collections
//!
//! Lists, sets and maps stored inside a document carry a reference to the
//! document that owns them (its [`DocumentHandle`] plus the field name) and a
//! `modified` flag raised by every mutating method. The owning document reads
//! those flags when asked whether it is dirty, so no back pointer from the
//! collection to the document is needed.

use crate::Value;
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an in-memory document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentHandle(u64);

impl DocumentHandle {
    /// Allocate a fresh handle
    pub fn next() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Where a collection lives: the owning document and the field holding it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerRef {
    pub handle: DocumentHandle,
    pub field: Option<String>,
}

impl OwnerRef {
    pub fn new(handle: DocumentHandle, field: impl Into<String>) -> Self {
        Self {
            handle,
            field: Some(field.into()),
        }
    }

    /// Owned by a document without a known field
    pub const fn document(handle: DocumentHandle) -> Self {
        Self {
            handle,
            field: None,
        }
    }
}

/// Loading strategy of a collection's record references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CollectionFlavor {
    /// Elements are held in memory as-is
    #[default]
    Tracked,
    /// Record references are resolved on first access
    LazyRecords,
}

#[derive(Debug, Clone, Default)]
struct Tracking {
    owner: Option<OwnerRef>,
    flavor: CollectionFlavor,
    modified: bool,
}

macro_rules! impl_tracking {
    ($name:ident) => {
        impl $name {
            /// Empty collection of the given flavor
            pub fn with_flavor(flavor: CollectionFlavor) -> Self {
                let mut collection = Self::default();
                collection.tracking.flavor = flavor;
                collection
            }

            pub fn owner(&self) -> Option<&OwnerRef> {
                self.tracking.owner.as_ref()
            }

            pub fn set_owner(&mut self, owner: Option<OwnerRef>) {
                self.tracking.owner = owner;
            }

            /// Builder form of [`Self::set_owner`]
            pub fn owned_by(mut self, owner: OwnerRef) -> Self {
                self.tracking.owner = Some(owner);
                self
            }

            pub fn flavor(&self) -> CollectionFlavor {
                self.tracking.flavor
            }

            pub fn is_lazy(&self) -> bool {
                self.tracking.flavor == CollectionFlavor::LazyRecords
            }

            /// True once any mutating method ran since the last [`Self::mark_clean`]
            pub fn is_modified(&self) -> bool {
                self.tracking.modified
            }

            pub fn mark_clean(&mut self) {
                self.tracking.modified = false;
            }

            fn touch(&mut self) {
                if !self.tracking.modified {
                    if let Some(owner) = &self.tracking.owner {
                        log::trace!(
                            "collection in field {:?} of document {} modified",
                            owner.field,
                            owner.handle.get()
                        );
                    }
                }
                self.tracking.modified = true;
            }
        }
    };
}

/// Ordered, heterogeneous list
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct TrackedList {
    items: Vec<Value>,
    #[serde(skip)]
    tracking: Tracking,
}

impl_tracking!(TrackedList);

impl TrackedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.touch();
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.items
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.touch();
        self.items.push(value.into());
    }

    pub fn insert(&mut self, index: usize, value: impl Into<Value>) {
        self.touch();
        let index = index.min(self.items.len());
        self.items.insert(index, value.into());
    }

    /// Replace the element at `index`, returning the previous one
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Option<Value> {
        let slot = self.items.get_mut(index)?;
        let previous = std::mem::replace(slot, value.into());
        self.touch();
        Some(previous)
    }

    pub fn remove(&mut self, index: usize) -> Option<Value> {
        if index >= self.items.len() {
            return None;
        }
        self.touch();
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.touch();
        self.items.clear();
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<Value> {
        &mut self.items
    }
}

impl PartialEq for TrackedList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl FromIterator<Value> for TrackedList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
            tracking: Tracking::default(),
        }
    }
}

impl Extend<Value> for TrackedList {
    fn extend<I: IntoIterator<Item = Value>>(&mut self, iter: I) {
        self.touch();
        self.items.extend(iter);
    }
}

impl IntoIterator for TrackedList {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a TrackedList {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Set of values unique by equality; iterates in insertion order
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct TrackedSet {
    items: Vec<Value>,
    #[serde(skip)]
    tracking: Tracking,
}

impl_tracking!(TrackedSet);

impl TrackedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.contains(value)
    }

    /// Element at an iteration position
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.items
    }

    /// Add a value; returns false when an equal value is already present
    pub fn insert(&mut self, value: impl Into<Value>) -> bool {
        let value = value.into();
        if self.items.contains(&value) {
            return false;
        }
        self.touch();
        self.items.push(value);
        true
    }

    pub fn remove(&mut self, value: &Value) -> bool {
        match self.items.iter().position(|item| item == value) {
            Some(index) => {
                self.touch();
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.touch();
        self.items.clear();
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<Value> {
        &mut self.items
    }
}

impl PartialEq for TrackedSet {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len()
            && self.items.iter().all(|item| other.items.contains(item))
    }
}

impl FromIterator<Value> for TrackedSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut items: Vec<Value> = Vec::new();
        for value in iter {
            if !items.contains(&value) {
                items.push(value);
            }
        }
        Self {
            items,
            tracking: Tracking::default(),
        }
    }
}

impl Extend<Value> for TrackedSet {
    fn extend<I: IntoIterator<Item = Value>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl IntoIterator for TrackedSet {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a TrackedSet {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// String-keyed map preserving insertion order
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct TrackedMap {
    entries: IndexMap<String, Value>,
    #[serde(skip)]
    tracking: Tracking,
}

impl_tracking!(TrackedMap);

impl TrackedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.touch();
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.touch();
        self.entries.insert(key.into(), value.into())
    }

    /// Remove an entry keeping the order of the remaining ones
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.entries.shift_remove(key);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.touch();
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_values(self) -> impl Iterator<Item = Value> {
        self.entries.into_values()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.entries.values_mut()
    }
}

impl PartialEq for TrackedMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for TrackedMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            tracking: Tracking::default(),
        }
    }
}

impl IntoIterator for TrackedMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_deduplicates_and_keeps_insertion_order() {
        let mut set = TrackedSet::new();
        assert!(set.insert(Value::Integer(3)));
        assert!(set.insert(Value::string("a")));
        assert!(!set.insert(Value::Integer(3)));

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_set_equality_ignores_order() {
        let a: TrackedSet = [Value::Integer(1), Value::Integer(2)].into_iter().collect();
        let b: TrackedSet = [Value::Integer(2), Value::Integer(1)].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_mutation_raises_modified_flag() {
        let owner = OwnerRef::new(DocumentHandle::next(), "tags");
        let mut list = TrackedList::new().owned_by(owner.clone());
        assert!(!list.is_modified());

        list.push(Value::Boolean(true));
        assert!(list.is_modified());
        assert_eq!(list.owner(), Some(&owner));

        list.mark_clean();
        assert!(list.remove(5).is_none());
        assert!(!list.is_modified());
    }

    #[test]
    fn test_equality_ignores_owner_and_flavor() {
        let a = TrackedList::with_flavor(CollectionFlavor::LazyRecords)
            .owned_by(OwnerRef::document(DocumentHandle::next()));
        let b = TrackedList::new();
        assert_eq!(a, b);
    }

    #[test]
    fn test_map_remove_preserves_order() {
        let mut map: TrackedMap = [("a", Value::Integer(1)), ("b", Value::Integer(2))]
            .into_iter()
            .collect();
        map.insert("c", Value::Integer(3));
        map.remove("a");
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_handles_are_unique() {
        assert_ne!(DocumentHandle::next(), DocumentHandle::next());
    }
}
