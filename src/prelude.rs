//! Convenient imports for cells-json.
//!
//! ```
//! use cells_json::prelude::*;
//!
//! let adapter = BackendAdapter::builder().backend(BackendKind::Text).build()?;
//! let encoded = adapter.encode(&Value::list([1, 2, 3]))?;
//! assert_eq!(encoded.as_bytes(), b"[1,2,3]");
//! # Ok::<(), Error>(())
//! ```

// Helpers
pub use crate::{dumps, load_json, loads, prettify, safe_dumps, save_json, SafeOptions};

// Error handling
pub use crate::{Error, Result};

// Values
pub use crate::{EnumMember, Fields, JsonValue, Mapping, Reflected, Sequence, Structured, Value};

// Conversion
pub use crate::{TypeConverter, ValueSerializer};

// Encoding
pub use crate::{BackendAdapter, BackendKind, EncodeOptions, Encoded};
