//! Text backend (Profile A)
//!
//! Every value is first reduced with the configured [`ValueSerializer`], then
//! the tree is written by a hand-written encoder. Output is a `String`.

mod decode;
mod encode;

pub use decode::{decode_json, DecodeError};
pub use encode::{encode_json, encode_string};

use crate::format::EncodeOptions;
use cells_json_core::{Error, JsonValue, Result, Value};
use cells_json_serializer::ValueSerializer;
use std::sync::Arc;

const BACKEND: &str = "text";

/// Profile A: serializer pre-walk plus hand-written JSON text codec.
#[derive(Debug, Clone)]
pub struct TextBackend {
    serializer: Arc<ValueSerializer>,
    options: EncodeOptions,
}

impl TextBackend {
    /// Create a text backend.
    pub fn new(serializer: Arc<ValueSerializer>, options: EncodeOptions) -> Self {
        Self { serializer, options }
    }

    /// Encode a value to JSON text.
    pub fn encode(&self, value: &Value) -> Result<String> {
        let tree = self.serializer.convert(value)?;
        Ok(encode_json(&tree, &self.options))
    }

    /// Decode JSON text or UTF-8 bytes.
    pub fn decode(&self, input: &[u8]) -> Result<JsonValue> {
        let text = std::str::from_utf8(input).map_err(|e| Error::Backend {
            backend: BACKEND,
            message: format!("input is not valid UTF-8: {}", e),
        })?;
        decode_json(text).map_err(|e| Error::Backend {
            backend: BACKEND,
            message: e.to_string(),
        })
    }
}
