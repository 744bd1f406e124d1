//! Backend Adapter Tests
//!
//! Selection, cross-backend determinism, streaming, and decoding.

use crate::*;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

fn sample_value() -> Value {
    Value::map([
        ("name", Value::from("caf\u{e9} \u{65e5}\u{672c}")),
        ("price", Value::from(Decimal::from_str("10.50").unwrap())),
        ("ratio", Value::from(0.1)),
        ("when", Value::from(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())),
        ("tags", Value::set(["a"])),
        ("nested", Value::map([("empty", Value::list(Vec::<Value>::new())), ("n", Value::Null)])),
        ("point", Value::object(Point { x: 3, y: -4, label: None })),
    ])
}

fn adapter(backend: BackendKind, native_types: bool, options: EncodeOptions) -> BackendAdapter {
    BackendAdapter::builder()
        .backend(backend)
        .native_types(native_types)
        .options(options)
        .build()
        .unwrap()
}

// =============================================================================
// SELECTION
// =============================================================================

#[test]
fn test_backend_names_parse() {
    assert_eq!("auto".parse::<BackendKind>().unwrap(), BackendKind::Auto);
    assert_eq!("text".parse::<BackendKind>().unwrap(), BackendKind::Text);
    assert_eq!("json".parse::<BackendKind>().unwrap(), BackendKind::Text);
    assert_eq!("native".parse::<BackendKind>().unwrap(), BackendKind::Accelerated);
    assert!(matches!("yaml".parse::<BackendKind>(), Err(Error::Config(_))));
}

#[test]
fn test_explicit_text_selection() {
    let adapter = adapter(BackendKind::Text, true, EncodeOptions::compact());
    assert_eq!(adapter.selected(), BackendKind::Text);
    assert!(adapter.encode(&Value::from(1)).unwrap().is_text());
}

#[cfg(feature = "accelerated")]
#[test]
fn test_auto_prefers_accelerated() {
    let adapter = BackendAdapter::new().unwrap();
    assert_eq!(adapter.requested(), BackendKind::Auto);
    assert_eq!(adapter.selected(), BackendKind::Accelerated);
    assert!(!adapter.encode(&Value::from(1)).unwrap().is_text());
}

#[cfg(not(feature = "accelerated"))]
#[test]
fn test_accelerated_unavailable_is_config_error() {
    let err = BackendAdapter::builder()
        .backend(BackendKind::Accelerated)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

// =============================================================================
// CROSS-BACKEND DETERMINISM
// =============================================================================

#[test]
fn test_auto_without_native_types_matches_text() {
    let configs = [
        EncodeOptions::compact(),
        EncodeOptions::pretty(2),
        EncodeOptions::pretty(4).with_ensure_ascii(true),
        EncodeOptions::compact().with_ensure_ascii(true),
    ];

    for options in configs {
        let auto = adapter(BackendKind::Auto, false, options.clone());
        let text = adapter(BackendKind::Text, false, options.clone());

        let a = auto.encode(&sample_value()).unwrap();
        let b = text.encode(&sample_value()).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes(), "mismatch for {:?}", options);
    }
}

#[test]
fn test_text_output_shape() {
    let text = adapter(BackendKind::Text, false, EncodeOptions::compact());
    let out = text.encode(&sample_value()).unwrap().into_string().unwrap();
    assert_eq!(
        out,
        "{\"name\":\"caf\u{e9} \u{65e5}\u{672c}\",\"nested\":{\"empty\":[],\"n\":null},\
         \"point\":{\"x\":3,\"y\":-4},\"price\":10.5,\"ratio\":0.1,\"tags\":[\"a\"],\
         \"when\":\"2024-01-01\"}"
    );
}

#[test]
fn test_ensure_ascii_escapes() {
    let text = adapter(
        BackendKind::Text,
        false,
        EncodeOptions::compact().with_ensure_ascii(true),
    );
    let out = text.encode(&Value::from("caf\u{e9}")).unwrap();
    assert_eq!(out.as_bytes(), br#""caf\u00e9""#);
}

#[cfg(feature = "accelerated")]
#[test]
fn test_native_rejects_opaque_objects() {
    let native = adapter(BackendKind::Accelerated, true, EncodeOptions::compact());
    let err = native.encode(&Value::object(Opaque)).unwrap_err();
    assert!(matches!(err, Error::Backend { backend: "accelerated", .. }));
}

#[cfg(feature = "accelerated")]
#[test]
fn test_hooked_preserves_policy_error() {
    let hooked = BackendAdapter::builder()
        .backend(BackendKind::Accelerated)
        .native_types(false)
        .serializer(ValueSerializer::builder().strict(true).build().unwrap())
        .build()
        .unwrap();
    let err = hooked.encode(&Value::object(Opaque)).unwrap_err();
    assert!(err.is_serialization());
}

// =============================================================================
// STREAMING AND DECODING
// =============================================================================

#[test]
fn test_encode_to_sink_and_decode_from_source() {
    for kind in [BackendKind::Text, BackendKind::Auto] {
        let adapter = adapter(kind, false, EncodeOptions::compact());
        let mut sink = Vec::new();
        adapter.encode_to_sink(&sample_value(), &mut sink).unwrap();

        let decoded = adapter.decode_from_source(sink.as_slice()).unwrap();
        assert_eq!(decoded.get("price"), Some(&JsonValue::Float(10.5)));
        assert_eq!(decoded.get("when"), Some(&JsonValue::from("2024-01-01")));
    }
}

#[test]
fn test_encode_to_sink_writes_nothing_on_failure() {
    let adapter = adapter(BackendKind::Text, false, EncodeOptions::compact());
    let mut sink = Vec::new();
    assert!(adapter.encode_to_sink(&Value::object(Opaque), &mut sink).is_err());
    assert!(sink.is_empty());
}

#[test]
fn test_decoders_agree() {
    let input = br#"{"a":[1,-2,3.5,1e3,18446744073709551615],"b":"\ud83d\ude00","c":null,"d":true}"#;
    let text = adapter(BackendKind::Text, false, EncodeOptions::compact());
    let auto = adapter(BackendKind::Auto, false, EncodeOptions::compact());

    let a = text.decode(input).unwrap();
    let b = auto.decode(input).unwrap();
    assert_eq!(a, b);

    let numbers = a.get("a").and_then(|v| v.as_array()).unwrap();
    assert_eq!(numbers[0], JsonValue::Int(1));
    assert_eq!(numbers[1], JsonValue::Int(-2));
    assert_eq!(numbers[2], JsonValue::Float(3.5));
    assert_eq!(numbers[3], JsonValue::Float(1000.0));
    assert_eq!(numbers[4], JsonValue::Float(18446744073709551615.0));
    assert_eq!(a.get("b").and_then(|v| v.as_str()), Some("\u{1f600}"));
}

#[test]
fn test_decode_malformed_is_backend_error() {
    for kind in [BackendKind::Text, BackendKind::Auto] {
        let adapter = adapter(kind, true, EncodeOptions::compact());
        for input in [
            &b"{"[..],
            b"[1,]",
            b"nul",
            b"\"abc",
            b"1 2",
            b"01",
            b"-012",
            b"[00]",
            b"1e400",
        ] {
            assert!(
                matches!(adapter.decode(input), Err(Error::Backend { .. })),
                "{:?} accepted {:?}",
                kind,
                String::from_utf8_lossy(input)
            );
        }
    }
}

#[test]
fn test_decoders_share_nesting_bound() {
    let nested = |n: usize| format!("{}{}", "[".repeat(n), "]".repeat(n)).into_bytes();

    for kind in [BackendKind::Text, BackendKind::Auto] {
        let adapter = adapter(kind, true, EncodeOptions::compact());
        assert!(adapter.decode(&nested(127)).is_ok(), "{:?} rejected 127 levels", kind);
        assert!(
            matches!(adapter.decode(&nested(128)), Err(Error::Backend { .. })),
            "{:?} accepted 128 levels",
            kind
        );
    }
}

// =============================================================================
// PROPERTIES
// =============================================================================

mod properties {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn arb_leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            any::<f64>().prop_map(Value::Float),
            "\\PC{0,12}".prop_map(Value::String),
        ]
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        arb_leaf().prop_recursive(4, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6)
                    .prop_map(|items: Vec<Value>| Value::list(items)),
                prop::collection::hash_map("[a-z]{1,6}", inner, 0..6)
                    .prop_map(|entries: HashMap<String, Value>| Value::map(entries)),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_hooked_and_text_agree(value in arb_value(), indent in prop::option::of(0usize..5), ascii in any::<bool>()) {
            let options = EncodeOptions { ensure_ascii: ascii, indent };
            let auto = adapter(BackendKind::Auto, false, options.clone());
            let text = adapter(BackendKind::Text, false, options);

            let a = auto.encode(&value).unwrap();
            let b = text.encode(&value).unwrap();
            prop_assert_eq!(a.as_bytes(), b.as_bytes());
        }
    }
}
