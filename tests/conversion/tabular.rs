//! Tabular Conversion Tests
//!
//! Arrays, frames and series through the default converter registry.

use crate::*;
use cells_json::{DataFrame, NumericArray, Series};

#[test]
fn test_array_in_map() {
    let array = NumericArray::from_vec(vec![1.5f64, 2.0]);
    let value = Value::map([("data", Value::object(array))]);
    assert_eq!(encode_text(&value), r#"{"data":[1.5,2.0]}"#);
}

#[test]
fn test_frame_rows() {
    let frame = DataFrame::new([
        ("A", NumericArray::from_vec(vec![1i64, 2])),
        ("B", NumericArray::from_vec(vec![true, false])),
    ])
    .unwrap();
    assert_eq!(
        encode_text(&Value::object(frame)),
        r#"[{"A":1,"B":true},{"A":2,"B":false}]"#
    );
}

#[test]
fn test_named_series() {
    let series = Series::new(NumericArray::from_vec(vec![1i64, 2, 3]))
        .unwrap()
        .with_name("values");
    assert_eq!(encode_text(&Value::object(series)), r#"{"values":[1,2,3]}"#);
}

#[test]
fn test_unnamed_series_with_labels() {
    let series = Series::new(NumericArray::from_vec(vec![10i64, 20]))
        .unwrap()
        .with_index(["a", "b"])
        .unwrap();
    assert_eq!(encode_text(&Value::object(series)), r#"{"a":10,"b":20}"#);
}

#[test]
fn test_without_default_converters_is_unsupported() {
    let serializer = ValueSerializer::builder()
        .without_default_converters()
        .build()
        .unwrap();
    let array = Value::object(NumericArray::from_vec(vec![1i64]));
    assert!(matches!(serializer.convert(&array), Err(Error::Unsupported { .. })));
}

#[test]
fn test_half_precision_array() {
    use cells_json::f16;

    let array = NumericArray::from_vec(vec![f16::from_f32(0.25), f16::from_f32(-1.0)]);
    assert_eq!(encode_text(&Value::object(array)), "[0.25,-1.0]");
}
