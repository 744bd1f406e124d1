//! Conversion Integration Test Suite
//!
//! End-to-end checks of the public surface: value conversion through the
//! serializer, both encoding backends behind the adapter, and the facade
//! helpers.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all conversion tests
//! cargo test --test conversion
//!
//! # Run cross-backend tests only
//! cargo test --test conversion backends::
//! ```

use cells_json::prelude::*;
use cells_json::TextBackend;
use std::sync::Arc;

// Test modules
pub mod backends;
pub mod builtin_types;
pub mod circular;
pub mod files;
pub mod policy;
#[cfg(feature = "tabular")]
pub mod tabular;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Convert with a default serializer
pub fn convert(value: &Value) -> JsonValue {
    ValueSerializer::new()
        .convert(value)
        .expect("conversion should succeed")
}

/// Compact text backend over the given serializer
pub fn text_backend(serializer: ValueSerializer) -> TextBackend {
    TextBackend::new(Arc::new(serializer), EncodeOptions::compact())
}

/// Encode with the text backend and default settings
pub fn encode_text(value: &Value) -> String {
    text_backend(ValueSerializer::new())
        .encode(value)
        .expect("text encoding should succeed")
}

/// Opaque object exposing no capability
pub struct Opaque;

impl Structured for Opaque {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Object exposing declared fields, one of them unset
pub struct Point {
    pub x: i64,
    pub y: i64,
    pub label: Option<String>,
}

impl Structured for Point {
    fn fields(&self) -> Option<Fields> {
        Some(Fields::Declared(vec![
            ("x", Some(Value::Int(self.x))),
            ("y", Some(Value::Int(self.y))),
            ("label", self.label.clone().map(Value::String)),
        ]))
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Mapping that contains itself under `"self"`
///
/// Callers clear the mapping afterwards to release the `Rc` cycle.
pub fn self_referential_map() -> Mapping {
    let map = Mapping::new();
    map.insert("name", "root");
    map.insert("self", Value::Map(map.clone()));
    map
}
