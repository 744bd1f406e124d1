//! Encoding backends for cells-json
//!
//! Two interchangeable encoders render [`Value`](cells_json_core::Value)s as
//! JSON:
//!
//! - **Text** ([`TextBackend`]): runs the value serializer over every input,
//!   then writes the reduced tree with a hand-written encoder
//! - **Accelerated** ([`AcceleratedBackend`], feature `accelerated`): serde_json
//!   with native support for temporal values, UUIDs and containers, or with
//!   the serializer installed as a hook
//!
//! [`BackendAdapter`] picks one at build time and exposes a single
//! encode/decode contract. Both backends share float formatting, escaping,
//! key ordering and indentation, so the text backend and the hooked
//! accelerated backend produce identical bytes.
//!
//! ## Examples
//!
//! ```
//! use cells_json_wire::{BackendAdapter, BackendKind};
//! use cells_json_core::Value;
//!
//! let adapter = BackendAdapter::builder()
//!     .backend(BackendKind::Text)
//!     .build()
//!     .unwrap();
//!
//! let encoded = adapter.encode(&Value::list([1, 2, 3])).unwrap();
//! assert_eq!(encoded.as_bytes(), b"[1,2,3]");
//!
//! let decoded = adapter.decode(b"[1,2,3]").unwrap();
//! assert_eq!(decoded.as_array().map(|a| a.len()), Some(3));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

#[cfg(feature = "accelerated")]
pub mod accelerated;
pub mod adapter;
pub mod format;
pub mod text;

#[cfg(feature = "accelerated")]
pub use accelerated::{AcceleratedBackend, NATIVE_RECURSION_LIMIT};
pub use adapter::{BackendAdapter, BackendAdapterBuilder, BackendKind, Encoded};
pub use format::{float_repr, EncodeOptions};
pub use text::{decode_json, encode_json, encode_string, DecodeError, TextBackend};
