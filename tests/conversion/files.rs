//! Facade Helper Tests
//!
//! dumps/loads, safe_dumps, prettify and the file helpers.

use crate::*;
use chrono::Duration;
use rust_decimal::Decimal;
use std::str::FromStr;
use tempfile::TempDir;

// =============================================================================
// IN-MEMORY HELPERS
// =============================================================================

#[test]
fn test_dumps_loads() {
    let value = Value::map([("id", Value::from(7)), ("ok", Value::from(true))]);
    let encoded = dumps(&value).unwrap();
    assert_eq!(encoded.as_bytes(), br#"{"id":7,"ok":true}"#);

    let decoded = loads(encoded.as_bytes()).unwrap();
    assert_eq!(decoded.get("id"), Some(&JsonValue::Int(7)));
    assert_eq!(decoded.get("ok"), Some(&JsonValue::Bool(true)));
}

#[test]
fn test_safe_dumps_ignore_errors() {
    let options = SafeOptions {
        ignore_errors: true,
        ..SafeOptions::default()
    };
    assert_eq!(safe_dumps(&Value::object(Opaque), &options).unwrap(), "null");
}

#[test]
fn test_safe_dumps_propagates_without_ignore() {
    let err = safe_dumps(&Value::object(Opaque), &SafeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Unsupported { .. }));
}

#[test]
fn test_prettify_matches_pretty_adapter() {
    let value = Value::map([("a", Value::list([1, 2])), ("b", Value::map([("c", 3)]))]);
    let pretty = prettify(&value, 4).unwrap();

    let adapter = BackendAdapter::builder()
        .backend(BackendKind::Text)
        .indent(4)
        .build()
        .unwrap();
    assert_eq!(pretty.as_bytes(), adapter.encode(&value).unwrap().as_bytes());
    assert!(pretty.starts_with("{\n    \"a\": [\n        1,"));
}

// =============================================================================
// FILES
// =============================================================================

#[test]
fn test_save_and_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a").join("b").join("doc.json");
    let value = Value::map([("items", Value::set([1, 2, 3]))]);

    save_json(&value, &path).unwrap();
    let loaded = load_json(&path).unwrap();

    let mut items: Vec<i64> = loaded
        .get("items")
        .and_then(|v| v.as_array())
        .unwrap()
        .iter()
        .filter_map(|v| v.as_int())
        .collect();
    items.sort_unstable();
    assert_eq!(items, vec![1, 2, 3]);
}

#[test]
fn test_save_decimal_duration_and_object() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("order.json");
    let value = Value::map([
        ("price", Value::from(Decimal::from_str("10.50").unwrap())),
        ("ttl", Value::from(Duration::hours(1) + Duration::minutes(30))),
        ("at", Value::object(Point { x: 1, y: 2, label: None })),
    ]);

    save_json(&value, &path).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(loaded.get("price"), Some(&JsonValue::Float(10.5)));
    assert_eq!(loaded.get("ttl"), Some(&JsonValue::Float(5400.0)));
    assert_eq!(loaded.get("at").and_then(|p| p.get("y")), Some(&JsonValue::Int(2)));
}

#[test]
fn test_load_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, b"{\"a\":").unwrap();

    assert!(matches!(load_json(&path), Err(Error::Backend { .. })));
}
