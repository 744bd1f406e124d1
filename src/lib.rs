//! # cells-json
//!
//! Policy-driven conversion of arbitrary values into JSON, with pluggable
//! encoding backends.
//!
//! A [`Value`] is first reduced to a [`JsonValue`] tree by the
//! [`ValueSerializer`]: temporal values become ISO-8601 strings, decimals
//! become floats, sets become lists, opaque objects are resolved through
//! their [`Structured`] capability or the unresolved-value policy, and
//! circular references are detected along the current path. A
//! [`BackendAdapter`] then writes the tree as JSON text or bytes.
//!
//! ## Quick Start
//!
//! ```
//! use cells_json::prelude::*;
//!
//! let value = Value::map([("name", Value::from("Alice")), ("age", Value::from(30))]);
//!
//! let encoded = cells_json::dumps(&value)?;
//! assert_eq!(encoded.as_bytes(), br#"{"age":30,"name":"Alice"}"#);
//!
//! let decoded = cells_json::loads(encoded.as_bytes())?;
//! assert_eq!(decoded.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! # Ok::<(), cells_json::Error>(())
//! ```
//!
//! ## Crates
//!
//! - [`cells_json_core`]: value universes, capability trait, error taxonomy
//! - [`cells_json_serializer`]: the conversion walk, policy and converter registry
//! - [`cells_json_wire`]: text and accelerated backends behind [`BackendAdapter`]

#![warn(missing_docs)]

mod fs;
mod helpers;

pub mod prelude;

pub use fs::{load_json, save_json};
pub use helpers::{dumps, loads, prettify, safe_dumps, SafeOptions};

// Re-export the workspace crates
pub use cells_json_core::{
    short_type_name, EnumMember, Error, Fields, JsonValue, Mapping, Reflected, Result, Sequence,
    Structured, Value,
};
#[cfg(feature = "tabular")]
pub use cells_json_core::{f16, DataFrame, Element, NumericArray, Scalar, Series};
pub use cells_json_serializer::{
    ConverterRegistry, FallbackFn, TypeConverter, ValueSerializer, ValueSerializerBuilder,
    DEFAULT_MAX_DEPTH,
};
#[cfg(feature = "accelerated")]
pub use cells_json_wire::AcceleratedBackend;
pub use cells_json_wire::{
    BackendAdapter, BackendAdapterBuilder, BackendKind, EncodeOptions, Encoded, TextBackend,
};
