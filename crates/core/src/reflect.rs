//! Serde-backed field enumeration
//!
//! [`Reflected`] gives any `Serialize` type the [`Structured`] capability
//! without a hand-written impl: the wrapped value is serialized with serde
//! and, when it serializes as a JSON object, its fields are exposed as a
//! dynamic attribute table.

use crate::json::JsonValue;
use crate::value::{short_type_name, Fields, Structured, Value};
use serde::Serialize;
use std::any::Any;

/// Opaque object whose fields are discovered through its `Serialize` impl.
///
/// ```
/// use cells_json_core::{Reflected, Value};
///
/// #[derive(serde::Serialize)]
/// struct User { name: String, age: u32 }
///
/// let user = Value::object(Reflected::new(User { name: "Alice".into(), age: 25 }));
/// assert_eq!(user.type_name(), "User");
/// ```
#[derive(Debug, Clone)]
pub struct Reflected<T> {
    inner: T,
}

impl<T: Serialize + 'static> Reflected<T> {
    /// Wrap a value.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Borrow the wrapped value.
    pub fn get(&self) -> &T {
        &self.inner
    }
}

impl<T: Serialize + 'static> Structured for Reflected<T> {
    fn type_name(&self) -> &str {
        short_type_name(std::any::type_name::<T>())
    }

    fn fields(&self) -> Option<Fields> {
        match serde_json::to_value(&self.inner).ok()? {
            serde_json::Value::Object(obj) => Some(Fields::Dynamic(
                obj.into_iter()
                    .map(|(k, v)| (k, Value::Json(JsonValue::from(v))))
                    .collect(),
            )),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
