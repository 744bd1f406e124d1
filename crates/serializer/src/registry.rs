//! Converter registry for optional object categories
//!
//! Opaque objects are offered to each registered [`TypeConverter`] in
//! registration order before the generic object rule runs. The first
//! converter that recognises the object wins; its output is converted again,
//! so a converter may return any [`Value`].
//!
//! With the `tabular` feature the default registry handles numeric arrays,
//! data frames and series.

use cells_json_core::{Result, Structured, Value};
#[cfg(feature = "tabular")]
use cells_json_core::{DataFrame, Error, JsonValue, NumericArray, Scalar, Series};
#[cfg(feature = "tabular")]
use std::collections::HashMap;

/// Converts one category of opaque object.
pub trait TypeConverter: Send + Sync {
    /// Converter name (for logs).
    fn name(&self) -> &'static str;

    /// Convert `object`, or return `None` when it is not of this category.
    fn convert(&self, object: &dyn Structured) -> Option<Result<Value>>;
}

/// Ordered list of converters.
#[derive(Default)]
pub struct ConverterRegistry {
    converters: Vec<Box<dyn TypeConverter>>,
}

impl ConverterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in converters for the enabled features.
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(feature = "tabular")]
        {
            registry.register(ArrayConverter);
            registry.register(FrameConverter);
            registry.register(SeriesConverter);
        }
        registry
    }

    /// Append a converter; it is consulted after those already registered.
    pub fn register<C: TypeConverter + 'static>(&mut self, converter: C) {
        self.converters.push(Box::new(converter));
    }

    /// Number of registered converters.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Check if no converters are registered.
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Names of the registered converters, in consultation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.converters.iter().map(|c| c.name()).collect()
    }

    /// Offer `object` to each converter in turn.
    pub fn convert(&self, object: &dyn Structured) -> Option<(&'static str, Result<Value>)> {
        self.converters
            .iter()
            .find_map(|c| c.convert(object).map(|result| (c.name(), result)))
    }
}

// =============================================================================
// Tabular converters
// =============================================================================

/// Numeric array → nested sequences, 0-d array → bare scalar.
#[cfg(feature = "tabular")]
pub struct ArrayConverter;

/// Data frame → one mapping per row, keyed by column name.
#[cfg(feature = "tabular")]
pub struct FrameConverter;

/// Series → `{name: [values]}`, or `{label: value}` when unnamed.
#[cfg(feature = "tabular")]
pub struct SeriesConverter;

#[cfg(feature = "tabular")]
fn scalar_to_json(scalar: Scalar) -> JsonValue {
    match scalar {
        Scalar::Int(i) => JsonValue::Int(i),
        Scalar::UInt(u) => match i64::try_from(u) {
            Ok(i) => JsonValue::Int(i),
            // Above i64::MAX the value is kept as the nearest double
            Err(_) => JsonValue::Float(u as f64),
        },
        Scalar::Float(f) => JsonValue::Float(f),
        Scalar::Bool(b) => JsonValue::Bool(b),
    }
}

#[cfg(feature = "tabular")]
fn array_to_json(array: &NumericArray) -> JsonValue {
    array.fold(&scalar_to_json, &JsonValue::Array)
}

#[cfg(feature = "tabular")]
fn column_values(array: &NumericArray) -> Vec<JsonValue> {
    (0..array.len())
        .filter_map(|i| array.get(i))
        .map(scalar_to_json)
        .collect()
}

#[cfg(feature = "tabular")]
fn label_key(label: &Value) -> Result<String> {
    use crate::temporal;

    Ok(match label {
        Value::String(s) => s.clone(),
        Value::Int(i) => i.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Float(f) => JsonValue::Float(*f).to_key(),
        Value::Date(d) => temporal::iso_date(d),
        Value::DateTime(dt) => temporal::iso_datetime(dt),
        Value::LocalDateTime(dt) => temporal::iso_local_datetime(dt),
        Value::Time(t) => temporal::iso_time(t),
        Value::Uuid(u) => u.hyphenated().to_string(),
        Value::Json(json) => json.to_key(),
        other => {
            return Err(Error::unsupported(
                other.type_name(),
                Some("Series labels must be scalars"),
            ))
        }
    })
}

#[cfg(feature = "tabular")]
impl TypeConverter for ArrayConverter {
    fn name(&self) -> &'static str {
        "ndarray"
    }

    fn convert(&self, object: &dyn Structured) -> Option<Result<Value>> {
        let array = object.as_any().downcast_ref::<NumericArray>()?;
        Some(Ok(Value::Json(array_to_json(array))))
    }
}

#[cfg(feature = "tabular")]
impl TypeConverter for FrameConverter {
    fn name(&self) -> &'static str {
        "dataframe"
    }

    fn convert(&self, object: &dyn Structured) -> Option<Result<Value>> {
        let frame = object.as_any().downcast_ref::<DataFrame>()?;
        let records = (0..frame.num_rows())
            .map(|row| {
                let record: HashMap<String, JsonValue> = frame
                    .columns()
                    .filter_map(|(name, col)| col.get(row).map(|x| (name.to_string(), scalar_to_json(x))))
                    .collect();
                JsonValue::Object(record)
            })
            .collect();
        Some(Ok(Value::Json(JsonValue::Array(records))))
    }
}

#[cfg(feature = "tabular")]
impl TypeConverter for SeriesConverter {
    fn name(&self) -> &'static str {
        "series"
    }

    fn convert(&self, object: &dyn Structured) -> Option<Result<Value>> {
        let series = object.as_any().downcast_ref::<Series>()?;
        let values = column_values(series.values());

        if let Some(name) = series.name() {
            let mut named = HashMap::with_capacity(1);
            named.insert(name.to_string(), JsonValue::Array(values));
            return Some(Ok(Value::Json(JsonValue::Object(named))));
        }

        let keys: Result<Vec<String>> = match series.index() {
            Some(labels) => labels.iter().map(label_key).collect(),
            None => Ok((0..values.len()).map(|i| i.to_string()).collect()),
        };
        Some(keys.map(|keys| {
            Value::Json(JsonValue::Object(keys.into_iter().zip(values).collect()))
        }))
    }
}
