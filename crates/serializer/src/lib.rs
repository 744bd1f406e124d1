//! Value serializer for cells-json
//!
//! Reduces [`Value`](cells_json_core::Value) graphs to
//! [`JsonValue`](cells_json_core::JsonValue) trees:
//!
//! - [`ValueSerializer`]: recursive type dispatch with cycle detection
//! - [`Policy`]: strict / ignore-unknown / fallback handling of values no rule
//!   can convert, and sentinel-or-fail handling of cycles
//! - [`ConverterRegistry`]: pluggable converters for opaque object categories
//!   (numeric arrays, data frames and series with the `tabular` feature)
//! - [`temporal`]: ISO-8601 rendering shared with the encoding backends

#![warn(missing_docs)]
#![warn(clippy::all)]

mod context;
pub mod policy;
pub mod registry;
pub mod serializer;
pub mod temporal;

pub use policy::{FallbackFn, OnCircular, Policy, Unresolved};
#[cfg(feature = "tabular")]
pub use registry::{ArrayConverter, FrameConverter, SeriesConverter};
pub use registry::{ConverterRegistry, TypeConverter};
pub use serializer::{ValueSerializer, ValueSerializerBuilder, DEFAULT_MAX_DEPTH};
