//! Query helpers over resolved values
//!
//! `contains` follows CONTAINS operator semantics: whichever side is a
//! collection is searched for the other. `union` gathers values from several
//! fields or records into one set.

use docrec_types::{TrackedSet, Value, values_equal};

/// True when a collection on either side holds a value equal to the other side
///
/// The left side is searched first. Equality is numeric across widths and
/// matches links with documents of the same identity.
pub fn contains(left: &Value, right: &Value) -> bool {
    if let Some(items) = left.elements() {
        return items.iter().any(|item| values_equal(right, item));
    }
    if let Some(items) = right.elements() {
        return items.iter().any(|item| values_equal(left, item));
    }
    false
}

/// True when any element of a list or set satisfies `predicate`
///
/// Non-collections never match.
pub fn contains_matching(collection: &Value, predicate: impl FnMut(&Value) -> bool) -> bool {
    collection
        .elements()
        .is_some_and(|items| items.iter().any(predicate))
}

/// Union of values in one call
///
/// Lists and sets contribute their elements, nulls are skipped, duplicates
/// collapse. The result is a set in first-seen order.
pub fn union(values: impl IntoIterator<Item = Value>) -> Value {
    let mut accumulator = UnionAccumulator::new();
    for value in values {
        accumulator.add(value);
    }
    accumulator.finish()
}

/// Union built up across calls, one value per record
#[derive(Debug, Clone, Default)]
pub struct UnionAccumulator {
    items: TrackedSet,
}

impl UnionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: Value) {
        match value {
            Value::Null => {}
            Value::List(list) => self.items.extend(list),
            Value::Set(set) => self.items.extend(set),
            other => {
                self.items.insert(other);
            }
        }
    }

    /// Fold in a partial result produced elsewhere
    pub fn merge(&mut self, partial: UnionAccumulator) {
        self.items.extend(partial.items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn finish(mut self) -> Value {
        self.items.mark_clean();
        Value::Set(self.items)
    }
}

/// Combine partial unions into one set
pub fn merge_unions(partials: impl IntoIterator<Item = UnionAccumulator>) -> Value {
    let mut total = UnionAccumulator::new();
    for partial in partials {
        total.merge(partial);
    }
    total.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docrec_types::{Document, RecordId};

    #[test]
    fn test_contains_either_side() {
        let list = Value::list([Value::Integer(1), Value::string("a")]);
        assert!(contains(&list, &Value::Long(1)));
        assert!(contains(&Value::string("a"), &list));
        assert!(!contains(&list, &Value::string("b")));
        assert!(!contains(&Value::Integer(1), &Value::Integer(1)));
    }

    #[test]
    fn test_contains_link_and_document() {
        let rid = RecordId::new(4, 4);
        let docs = Value::list([Value::embedded(Document::new().with_identity(rid))]);
        assert!(contains(&docs, &Value::Link(rid)));
    }

    #[test]
    fn test_contains_matching() {
        let list = Value::list([Value::Integer(1), Value::Integer(5)]);
        assert!(contains_matching(&list, |v| v.as_i64() > Some(3)));
        assert!(!contains_matching(&Value::Integer(5), |_| true));
    }

    #[test]
    fn test_union_flattens_and_dedupes() {
        let result = union([
            Value::list([Value::Integer(1), Value::Integer(2)]),
            Value::Null,
            Value::Integer(2),
            Value::set([Value::Integer(3)]),
        ]);
        assert_eq!(
            result,
            Value::set([Value::Integer(1), Value::Integer(2), Value::Integer(3)])
        );
    }

    #[test]
    fn test_merge_partials() {
        let mut a = UnionAccumulator::new();
        a.add(Value::Integer(1));
        let mut b = UnionAccumulator::new();
        b.add(Value::list([Value::Integer(1), Value::Integer(9)]));

        let merged = merge_unions([a, b]);
        assert_eq!(merged, Value::set([Value::Integer(1), Value::Integer(9)]));
    }
}
