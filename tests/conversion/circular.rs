//! Circular Reference Tests
//!
//! Sentinel rendering, fail mode, and the absence of false positives for
//! shared but acyclic references.

use crate::*;

// =============================================================================
// SELF-REFERENCE
// =============================================================================

#[test]
fn test_self_referential_map_sentinel() {
    let map = self_referential_map();

    let text = encode_text(&Value::Map(map.clone()));
    assert!(text.contains("CircularReference"));
    assert_eq!(text, r#"{"name":"root","self":"<CircularReference Map>"}"#);

    map.borrow_mut().clear();
}

#[test]
fn test_self_referential_map_fails_when_configured() {
    let map = self_referential_map();
    let serializer = ValueSerializer::builder()
        .fail_on_circular(true)
        .build()
        .unwrap();

    let err = serializer.convert(&Value::Map(map.clone())).unwrap_err();
    match &err {
        Error::CircularReference { type_name, path } => {
            assert_eq!(type_name, "Map");
            assert_eq!(path, "$.self");
        }
        other => panic!("expected CircularReference, got {:?}", other),
    }
    assert!(err.is_serialization());
    assert!(err.to_string().contains("Circular reference detected"));

    map.borrow_mut().clear();
}

#[test]
fn test_indirect_cycle_through_list() {
    let outer = Mapping::new();
    let items = Sequence::new();
    items.push(Value::Map(outer.clone()));
    outer.insert("items", Value::List(items.clone()));

    assert_eq!(
        encode_text(&Value::Map(outer.clone())),
        r#"{"items":["<CircularReference Map>"]}"#
    );

    outer.borrow_mut().clear();
}

// =============================================================================
// NO FALSE POSITIVES
// =============================================================================

#[test]
fn test_sibling_references_are_not_cycles() {
    let shared = Value::list([1, 2]);
    let value = Value::map([("a", shared.clone()), ("b", shared)]);
    assert_eq!(encode_text(&value), r#"{"a":[1,2],"b":[1,2]}"#);
}

#[test]
fn test_same_value_in_consecutive_calls() {
    let serializer = ValueSerializer::builder()
        .fail_on_circular(true)
        .build()
        .unwrap();
    let value = Value::map([("inner", Value::list([1]))]);

    let first = serializer.convert(&value).unwrap();
    let second = serializer.convert(&value).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_same_object_repeated_in_list() {
    let point = Value::object(Point { x: 0, y: 0, label: None });
    let value = Value::list([point.clone(), point]);
    assert_eq!(encode_text(&value), r#"[{"x":0,"y":0},{"x":0,"y":0}]"#);
}

#[test]
fn test_failed_call_leaves_no_identity_behind() {
    let strict = ValueSerializer::builder().strict(true).build().unwrap();
    let shared = Value::list([Value::object(Opaque)]);

    assert!(matches!(strict.convert(&shared), Err(Error::Unsupported { .. })));

    // Same list again: a leaked identity would be reported as a cycle
    let lenient = ValueSerializer::builder()
        .ignore_unknown(true)
        .fail_on_circular(true)
        .build()
        .unwrap();
    assert_eq!(lenient.convert(&shared).unwrap(), JsonValue::Array(vec![JsonValue::Null]));
    assert!(matches!(strict.convert(&shared), Err(Error::Unsupported { .. })));
}
