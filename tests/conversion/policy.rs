//! Unresolved-Value Policy Tests
//!
//! Behaviour for objects that expose no capability.

use crate::*;

fn opaque_in_map() -> Value {
    Value::map([("thing", Value::object(Opaque))])
}

#[test]
fn test_strict_raises_unsupported() {
    let serializer = ValueSerializer::builder().strict(true).build().unwrap();
    let err = serializer.convert(&opaque_in_map()).unwrap_err();
    assert!(matches!(err, Error::Unsupported { ref type_name, .. } if type_name == "Opaque"));
}

#[test]
fn test_ignore_unknown_gives_null() {
    let serializer = ValueSerializer::builder().ignore_unknown(true).build().unwrap();
    let encoded = text_backend(serializer).encode(&opaque_in_map()).unwrap();
    assert_eq!(encoded, r#"{"thing":null}"#);
}

#[test]
fn test_neither_raises_unsupported_with_hint() {
    let err = ValueSerializer::new().convert(&opaque_in_map()).unwrap_err();
    assert!(matches!(err, Error::Unsupported { .. }));
    assert!(err.to_string().starts_with("Unsupported type: Opaque"));
}

#[test]
fn test_fallback_result_used_verbatim() {
    let serializer = ValueSerializer::builder()
        .fallback(|value: &Value| Ok(JsonValue::from(format!("<{}>", value.type_name()))))
        .build()
        .unwrap();
    let encoded = text_backend(serializer).encode(&opaque_in_map()).unwrap();
    assert_eq!(encoded, r#"{"thing":"<Opaque>"}"#);
}

#[test]
fn test_policy_not_applied_to_cycles() {
    let map = self_referential_map();
    let serializer = ValueSerializer::builder()
        .strict(true)
        .fail_on_circular(true)
        .build()
        .unwrap();

    let err = serializer.convert(&Value::Map(map.clone())).unwrap_err();
    assert!(matches!(err, Error::CircularReference { .. }));

    map.borrow_mut().clear();
}

#[test]
fn test_max_depth_exceeded() {
    let serializer = ValueSerializer::builder().max_depth(3).build().unwrap();
    let deep = Value::list([Value::list([Value::list([Value::list([1])])])]);

    let err = serializer.convert(&deep).unwrap_err();
    assert!(matches!(err, Error::Serialization { .. }));
}

#[test]
fn test_zero_max_depth_rejected() {
    let err = ValueSerializer::builder().max_depth(0).build().unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
