//! Path resolution tests
//!
//! Covers:
//! - Computed attributes
//! - Descending through embedded documents, lazy documents and links
//! - Bracket indexing: names, positions, ranges and filters
//! - Error reporting for malformed paths and bad indexes
//! - Query helpers: sort and union over resolved values

use docrec_diagnostics::{RecordError, Result};
use docrec_path::*;
use docrec_types::{Document, RecordId, Value};
use mockall::mock;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

mock! {
    Loader {}

    impl RecordLoader for Loader {
        fn load(&self, rid: &RecordId) -> Result<Document>;
    }
}

fn employee(name: &str, age: i64) -> Value {
    Value::embedded(
        Document::with_class("Employee")
            .with_field("name", name)
            .with_field("age", age),
    )
}

fn company() -> Document {
    let address = Document::new()
        .with_field("city", "Oslo")
        .with_field("zip", "0150");

    Document::with_class("Company")
        .with_identity(RecordId::new(12, 3))
        .with_version(4)
        .with_field("name", "Acme")
        .with_field("address", Value::embedded(address))
        .with_field(
            "employees",
            Value::list([
                employee("Ann", 30),
                employee("Bob", 41),
                employee("Cid", 30),
            ]),
        )
        .with_field(
            "tags",
            Value::list(["a", "b", "c", "d"].map(Value::string)),
        )
        .with_field("codes", Value::set([Value::Integer(7), Value::Integer(9)]))
        .with_field(
            "matrix",
            Value::list([
                Value::list([Value::Integer(1), Value::Integer(2)]),
                Value::list([Value::Integer(3), Value::Integer(4)]),
            ]),
        )
        .with_field(
            "extra",
            Value::map([("level", Value::Short(3)), ("mode", Value::string("fast"))]),
        )
        .with_field("data", vec![65u8, 66])
}

fn strings(items: &[&str]) -> Value {
    Value::list(items.iter().map(|item| Value::string(*item)))
}

// === Attributes ===

#[rstest]
#[case("@rid", Value::Link(RecordId::new(12, 3)))]
#[case("@RID", Value::Link(RecordId::new(12, 3)))]
#[case("@version", Value::Integer(4))]
#[case("@class", Value::string("Company"))]
#[case("@type", Value::string("document"))]
fn test_attributes(#[case] path: &str, #[case] expected: Value) {
    assert_eq!(resolve(&company(), path), Ok(expected));
}

#[test]
fn test_fields_attribute() {
    let doc = Document::new().with_field("b", 1).with_field("a", 2);
    assert_eq!(resolve(&doc, "@fields"), Ok(strings(&["b", "a"])));
}

#[test]
fn test_size_is_record_text_length() {
    let doc = Document::with_class("P").with_field("a", 1);
    assert_eq!(resolve(&doc, "@size"), Ok(Value::Integer(5)));
}

#[test]
fn test_this_and_missing_class() {
    let doc = Document::new().with_field("a", 1);
    assert_eq!(resolve(&doc, "@this"), Ok(Value::embedded(doc.clone())));
    assert_eq!(resolve(&doc, "@class"), Ok(Value::Null));
}

#[test]
fn test_attribute_of_nested_document() {
    let doc = company();
    let employees = resolve(&doc, "employees[1].@class").unwrap();
    assert_eq!(employees, Value::string("Employee"));
}

#[test]
fn test_unknown_attribute() {
    assert_eq!(
        resolve(&company(), "@weight"),
        Err(RecordError::unknown_attribute("@weight"))
    );
}

// === Descending ===

#[rstest]
#[case("name", Value::string("Acme"))]
#[case("address.city", Value::string("Oslo"))]
#[case("employees[0].name", Value::string("Ann"))]
#[case("employees[name = 'Bob'].age", Value::Long(41))]
#[case("missing", Value::Null)]
#[case("missing.city", Value::Null)]
#[case("address.country", Value::Null)]
#[case("name.first", Value::Null)]
#[case("extra.level", Value::Null)]
fn test_descend(#[case] path: &str, #[case] expected: Value) {
    assert_eq!(resolve(&company(), path), Ok(expected));
}

#[test]
fn test_link_loaded_through_loader() {
    let rid = RecordId::new(5, 0);
    let mut loader = MockLoader::new();
    loader
        .expect_load()
        .withf(move |requested| *requested == rid)
        .times(1)
        .returning(|rid| Ok(Document::with_class("City").with_identity(*rid).with_field("name", "Oslo")));

    let doc = Document::new().with_field("home", rid);
    let resolver = PathResolver::new(&loader);
    assert_eq!(resolver.resolve(&doc, "home.name"), Ok(Value::string("Oslo")));
}

#[test]
fn test_lazy_document_materialized() {
    let rid = RecordId::new(5, 1);
    let mut loader = MockLoader::new();
    loader
        .expect_load()
        .times(1)
        .returning(|rid| Ok(Document::new().with_identity(*rid).with_field("zip", "0150")));

    let doc = Document::new().with_field("address", Value::embedded(Document::unloaded(rid)));
    let resolver = PathResolver::new(&loader);
    assert_eq!(resolver.resolve(&doc, "address.zip"), Ok(Value::string("0150")));
}

#[test]
fn test_loaded_document_skips_loader() {
    let mut loader = MockLoader::new();
    loader.expect_load().never();

    let resolver = PathResolver::new(&loader);
    assert_eq!(resolver.resolve(&company(), "address.zip"), Ok(Value::string("0150")));
}

#[test]
fn test_missing_record_fails() {
    let doc = Document::new().with_field("home", RecordId::new(5, 0));
    assert_eq!(
        resolve(&doc, "home.name"),
        Err(RecordError::record_not_found("#5:0"))
    );
}

#[test]
fn test_link_chain_with_in_memory_loader() {
    let city = RecordId::new(7, 1);
    let person = RecordId::new(8, 1);
    let loader = InMemoryLoader::from_documents([
        Document::with_class("City").with_identity(city).with_field("name", "Bergen"),
        Document::with_class("Person")
            .with_identity(person)
            .with_field("city", city),
    ]);

    let doc = Document::new().with_field("owner", person);
    let resolver = PathResolver::new(&loader);
    assert_eq!(resolver.resolve(&doc, "owner.city.name"), Ok(Value::string("Bergen")));
    assert_eq!(resolver.resolve(&doc, "owner.@class"), Ok(Value::string("Person")));
}

// === Indexing ===

#[rstest]
#[case("tags[0]", Value::string("a"))]
#[case("tags[3]", Value::string("d"))]
#[case("tags[2,0]", strings(&["c", "a"]))]
#[case("tags[1-2]", strings(&["b", "c"]))]
#[case("tags[1-1]", strings(&["b"]))]
#[case("codes[1]", Value::Integer(9))]
#[case("data[0]", Value::Byte(65))]
#[case("matrix[1][0]", Value::Integer(3))]
#[case("matrix[0][0,1]", Value::list([Value::Integer(1), Value::Integer(2)]))]
#[case("extra['level']", Value::Short(3))]
#[case("extra[level]", Value::Short(3))]
#[case("extra['mode', \"level\"]", Value::list([Value::string("fast"), Value::Short(3)]))]
#[case("address['zip','city']", strings(&["0150", "Oslo"]))]
#[case("address[country]", Value::Null)]
#[case("name[0]", Value::Null)]
#[case("missing[0]", Value::Null)]
fn test_index(#[case] path: &str, #[case] expected: Value) {
    assert_eq!(resolve(&company(), path), Ok(expected));
}

#[test]
fn test_filter_collapses_by_match_count() {
    let doc = company();

    assert_eq!(resolve(&doc, "employees[name = 'Zed']"), Ok(Value::Null));
    assert_eq!(
        resolve(&doc, "employees[name = \"Ann\"]"),
        Ok(employee("Ann", 30))
    );
    assert_eq!(
        resolve(&doc, "employees[age = 30]"),
        Ok(Value::list([employee("Ann", 30), employee("Cid", 30)]))
    );
}

#[test]
fn test_filter_skips_non_documents() {
    assert_eq!(resolve(&company(), "tags[name = 'a']"), Ok(Value::Null));
}

#[rstest]
#[case("tags[4]", 4, 4)]
#[case("tags[-1]", -1, 4)]
#[case("tags[1-9]", 9, 4)]
#[case("tags[0,7]", 7, 4)]
fn test_index_out_of_range(#[case] path: &str, #[case] index: i64, #[case] length: usize) {
    assert_eq!(
        resolve(&company(), path),
        Err(RecordError::index_out_of_range(index, length))
    );
}

#[rstest]
#[case("tags[x]")]
#[case("tags[2-1]")]
#[case("tags[0")]
#[case("tags[0]x")]
#[case("tags[1.5]")]
fn test_malformed_path(#[case] path: &str) {
    let err = resolve(&company(), path).unwrap_err();
    assert!(
        matches!(err, RecordError::MalformedPath { .. }),
        "{path}: {err:?}"
    );
}

proptest! {
    #[test]
    fn test_range_is_inclusive(len in 1usize..20, a in 0usize..20, b in 0usize..20) {
        let (from, to) = (a.min(b) % len, a.max(b) % len);
        prop_assume!(from <= to);

        let doc = Document::new().with_field(
            "items",
            Value::list((0..len).map(|i| Value::Integer(i as i32))),
        );
        let result = resolve(&doc, &format!("items[{from}-{to}]")).unwrap();

        let expected = Value::list((from..=to).map(|i| Value::Integer(i as i32)));
        prop_assert_eq!(result, expected);
    }

    #[test]
    fn test_multi_select_keeps_order(indexes in prop::collection::vec(0usize..5, 2..6)) {
        let doc = Document::new().with_field(
            "items",
            Value::list((0..5).map(Value::Integer)),
        );
        let list = indexes.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
        let result = resolve(&doc, &format!("items[{list}]")).unwrap();

        let expected = Value::list(indexes.iter().map(|&i| Value::Integer(i as i32)));
        prop_assert_eq!(result, expected);
    }
}

// === Query helpers ===

fn names(documents: &[Document]) -> Vec<&str> {
    documents
        .iter()
        .map(|doc| doc.field("name").and_then(Value::as_str).unwrap_or("-"))
        .collect()
}

#[test]
fn test_sort_by_several_criteria() {
    let person = |name: &str, age: Option<i32>| {
        let doc = Document::new().with_field("name", name);
        match age {
            Some(age) => doc.with_field("age", age),
            None => doc,
        }
    };
    let mut docs = vec![
        person("Bob", Some(30)),
        person("Ann", Some(41)),
        person("Eve", None),
        person("Al", Some(30)),
    ];

    sort_documents(&mut docs, &[OrderBy::desc("age"), OrderBy::asc("name")]).unwrap();
    assert_eq!(names(&docs), vec!["Eve", "Ann", "Al", "Bob"]);

    sort_documents(&mut docs, &[OrderBy::asc("age")]).unwrap();
    assert_eq!(names(&docs), vec!["Eve", "Al", "Bob", "Ann"]);
}

#[test]
fn test_sort_error_leaves_order() {
    let mut docs = vec![
        Document::new().with_field("name", "b"),
        Document::new().with_field("name", "a"),
    ];
    let result = sort_documents(&mut docs, &[OrderBy::asc("name[")]);

    assert!(result.is_err());
    assert_eq!(names(&docs), vec!["b", "a"]);
}

#[test]
fn test_sort_by_nested_path() {
    let located = |name: &str, city: &str| {
        Document::new()
            .with_field("name", name)
            .with_field("address", Document::new().with_field("city", city))
    };
    let mut docs = vec![located("x", "Oslo"), located("y", "Bergen")];

    sort_documents(&mut docs, &["address.city".parse::<OrderBy>().unwrap()]).unwrap();
    assert_eq!(names(&docs), vec!["y", "x"]);
}

#[test]
fn test_union_of_resolved_fields() {
    let docs = [company(), company()];
    let mut accumulator = UnionAccumulator::new();
    for doc in &docs {
        accumulator.add(resolve(doc, "tags[0-1]").unwrap());
        accumulator.add(resolve(doc, "missing").unwrap());
    }

    assert_eq!(accumulator.len(), 2);
    assert_eq!(accumulator.finish(), Value::set(["a", "b"].map(Value::string)));
}

#[test]
fn test_contains_on_resolved_value() {
    let doc = company();
    let codes = resolve(&doc, "codes").unwrap();

    assert!(contains(&codes, &Value::Long(9)));
    assert!(!contains(&codes, &Value::Integer(8)));
    assert!(contains_matching(&resolve(&doc, "employees").unwrap(), |employee| {
        employee
            .as_document()
            .and_then(|doc| doc.field("age"))
            .is_some_and(|age| age.as_i64() == Some(41))
    }));
}
