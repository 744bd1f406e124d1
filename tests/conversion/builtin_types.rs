//! Built-in Type Conversion Tests
//!
//! Temporal values, decimals, identifiers, enums, paths and containers.

use crate::*;
use chrono::{Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// TEMPORAL
// =============================================================================

#[test]
fn test_datetime_with_offset() {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let dt = offset.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
    assert_eq!(convert(&Value::from(dt)), JsonValue::from("2024-01-15T10:30:00+02:00"));
}

#[test]
fn test_local_datetime_with_micros() {
    let dt = NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_micro_opt(10, 30, 0, 123_456)
        .unwrap();
    assert_eq!(convert(&Value::from(dt)), JsonValue::from("2024-01-15T10:30:00.123456"));
}

#[test]
fn test_date_and_time() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let time = NaiveTime::from_hms_opt(8, 5, 9).unwrap();
    assert_eq!(convert(&Value::from(date)), JsonValue::from("2024-01-01"));
    assert_eq!(convert(&Value::from(time)), JsonValue::from("08:05:09"));
}

#[test]
fn test_duration_as_total_seconds() {
    let duration = Duration::hours(1) + Duration::minutes(30);
    assert_eq!(convert(&Value::from(duration)), JsonValue::Float(5400.0));
    assert_eq!(encode_text(&Value::from(duration)), "5400.0");
}

// =============================================================================
// NUMERIC AND IDENTIFIERS
// =============================================================================

#[test]
fn test_decimal_to_float() {
    let a = Decimal::from_str("10.50").unwrap();
    let b = Decimal::from_str("99.99").unwrap();
    assert_eq!(convert(&Value::from(a)), JsonValue::Float(10.5));
    assert_eq!(convert(&Value::from(b)), JsonValue::Float(99.99));
    assert_eq!(encode_text(&Value::list([a, b])), "[10.5,99.99]");
}

#[test]
fn test_uuid_hyphenated() {
    let id = Uuid::from_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
    assert_eq!(
        convert(&Value::from(id)),
        JsonValue::from("67e55044-10b1-426f-9247-bb680e5fe0c8")
    );
}

#[test]
fn test_enum_member_uses_underlying_value() {
    let status = EnumMember::new("Status", "Active", "active");
    let level = EnumMember::new("Level", "High", 3);
    assert_eq!(convert(&Value::from(status)), JsonValue::from("active"));
    assert_eq!(convert(&Value::from(level)), JsonValue::Int(3));
}

#[test]
fn test_path_as_string() {
    let path = PathBuf::from("data").join("out.json");
    assert_eq!(convert(&Value::from(path)), JsonValue::from("data/out.json"));
}

// =============================================================================
// CONTAINERS
// =============================================================================

#[test]
fn test_set_becomes_list() {
    let value = Value::map([("items", Value::set([1, 2, 3]))]);
    let json = convert(&value);
    let items: HashSet<i64> = json
        .get("items")
        .and_then(|v| v.as_array())
        .unwrap()
        .iter()
        .filter_map(|v| v.as_int())
        .collect();
    assert_eq!(items, HashSet::from([1, 2, 3]));
}

#[test]
fn test_tuple_becomes_list() {
    let value = Value::tuple([Value::from(1), Value::from("two")]);
    assert_eq!(encode_text(&value), r#"[1,"two"]"#);
}

#[test]
fn test_nested_containers_sorted_keys() {
    let value = Value::map([
        ("zeta", Value::list([Value::map([("b", 2), ("a", 1)])])),
        ("alpha", Value::Null),
    ]);
    assert_eq!(encode_text(&value), r#"{"alpha":null,"zeta":[{"a":1,"b":2}]}"#);
}

// =============================================================================
// OBJECTS
// =============================================================================

#[test]
fn test_declared_fields_skip_unset() {
    let point = Value::object(Point { x: 1, y: 2, label: None });
    assert_eq!(encode_text(&point), r#"{"x":1,"y":2}"#);

    let labelled = Value::object(Point {
        x: 1,
        y: 2,
        label: Some("origin".to_string()),
    });
    assert_eq!(encode_text(&labelled), r#"{"label":"origin","x":1,"y":2}"#);
}

#[test]
fn test_reflected_serde_struct() {
    #[derive(serde::Serialize)]
    struct User {
        name: String,
        age: u32,
    }

    let user = Value::object(Reflected::new(User {
        name: "Alice".to_string(),
        age: 25,
    }));
    assert_eq!(encode_text(&user), r#"{"age":25,"name":"Alice"}"#);
}

#[test]
fn test_temporal_inside_object() {
    struct Event {
        at: NaiveDate,
    }

    impl Structured for Event {
        fn to_mapping(&self) -> Option<Value> {
            Some(Value::map([("at", Value::from(self.at))]))
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    let event = Value::object(Event {
        at: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    });
    assert_eq!(encode_text(&event), r#"{"at":"2024-03-01"}"#);
}
