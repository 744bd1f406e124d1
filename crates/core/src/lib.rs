//! Core types for cells-json
//!
//! This crate defines the two value universes the rest of the workspace
//! moves between:
//!
//! - [`Value`]: everything a caller may hand to the serializer (primitives,
//!   temporal values, decimals, identifiers, enum members, paths, shared
//!   containers, opaque objects)
//! - [`JsonValue`]: the reduced JSON tree every conversion produces
//!
//! It also carries the [`Structured`] capability trait that opaque objects
//! implement to become serializable, and the [`Error`] taxonomy shared by the
//! serializer and the encoding backends.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod json;
pub mod reflect;
#[cfg(feature = "tabular")]
pub mod tabular;
pub mod value;

pub use error::{Error, Result};
pub use json::JsonValue;
pub use reflect::Reflected;
#[cfg(feature = "tabular")]
pub use half::f16;
#[cfg(feature = "tabular")]
pub use tabular::{DataFrame, Element, NumericArray, Scalar, Series};
pub use value::{short_type_name, EnumMember, Fields, Mapping, Sequence, Structured, Value};
