//! Accelerated backend (Profile B)
//!
//! Built on `serde_json` with a custom [`Formatter`] that shares float
//! formatting, string escaping and indentation with the text backend.
//!
//! With `native_types` on, temporal values, UUIDs, enum members and
//! containers are encoded directly through their serde impls and anything
//! else is rejected. With `native_types` off, every non-primitive value is
//! routed through the [`ValueSerializer`] hook, which makes the output
//! byte-identical to the text backend's.

use crate::format::{float_repr, push_ascii_fragment, EncodeOptions};
use cells_json_core::{Error, JsonValue, Result, Value};
use cells_json_serializer::ValueSerializer;
use serde::ser::{Error as _, SerializeMap, SerializeSeq, Serializer};
use serde::Serialize;
use serde_json::ser::Formatter;
use std::cell::RefCell;
use std::io;
use std::sync::Arc;

/// Nesting bound of the native walk.
pub const NATIVE_RECURSION_LIMIT: usize = 254;

/// Profile B: serde_json encoder with optional native type support.
#[derive(Debug, Clone)]
pub struct AcceleratedBackend {
    serializer: Arc<ValueSerializer>,
    options: EncodeOptions,
    native_types: bool,
}

impl AcceleratedBackend {
    /// Create an accelerated backend.
    pub fn new(serializer: Arc<ValueSerializer>, options: EncodeOptions, native_types: bool) -> Self {
        Self {
            serializer,
            options,
            native_types,
        }
    }

    /// Whether native type support is on.
    pub fn native_types(&self) -> bool {
        self.native_types
    }

    /// Encode a value to UTF-8 JSON bytes.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(128);
        self.encode_into(value, &mut out)?;
        Ok(out)
    }

    /// Encode a value into `writer`.
    pub fn encode_into<W: io::Write>(&self, value: &Value, writer: W) -> Result<()> {
        let mut ser = serde_json::Serializer::with_formatter(writer, WireFormatter::new(&self.options));
        if self.native_types {
            return Native::root(value).serialize(&mut ser).map_err(backend_error);
        }

        let failure = RefCell::new(None);
        let hooked = Hooked {
            value,
            serializer: &self.serializer,
            failure: &failure,
        };
        hooked
            .serialize(&mut ser)
            // Surface the serializer's own error rather than its message
            .map_err(|e| failure.take().unwrap_or_else(|| backend_error(e)))
    }

    /// Decode UTF-8 JSON bytes.
    pub fn decode(&self, input: &[u8]) -> Result<JsonValue> {
        let value: serde_json::Value = serde_json::from_slice(input)?;
        Ok(JsonValue::from(value))
    }

    /// Decode JSON read from `reader`.
    pub fn decode_from<R: io::Read>(&self, reader: R) -> Result<JsonValue> {
        let value: serde_json::Value = serde_json::from_reader(reader).map_err(backend_error)?;
        Ok(JsonValue::from(value))
    }
}

fn backend_error(e: serde_json::Error) -> Error {
    if e.is_io() {
        Error::Io(io::Error::from(e))
    } else {
        Error::from(e)
    }
}

// =============================================================================
// Formatter
// =============================================================================

struct WireFormatter {
    indent: Option<Vec<u8>>,
    ensure_ascii: bool,
    level: usize,
    has_value: bool,
}

impl WireFormatter {
    fn new(options: &EncodeOptions) -> Self {
        Self {
            indent: options.indent.map(|width| vec![b' '; width]),
            ensure_ascii: options.ensure_ascii,
            level: 0,
            has_value: false,
        }
    }

    fn newline<W: ?Sized + io::Write>(&self, writer: &mut W) -> io::Result<()> {
        if let Some(indent) = &self.indent {
            writer.write_all(b"\n")?;
            for _ in 0..self.level {
                writer.write_all(indent)?;
            }
        }
        Ok(())
    }

    fn begin_value<W: ?Sized + io::Write>(&self, writer: &mut W, first: bool) -> io::Result<()> {
        if !first {
            writer.write_all(b",")?;
        }
        self.newline(writer)
    }

    fn open<W: ?Sized + io::Write>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()> {
        self.level += 1;
        self.has_value = false;
        writer.write_all(bracket)
    }

    fn close<W: ?Sized + io::Write>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()> {
        self.level -= 1;
        if self.has_value {
            self.newline(writer)?;
        }
        writer.write_all(bracket)
    }
}

impl Formatter for WireFormatter {
    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        match float_repr(value) {
            Some(repr) => writer.write_all(repr.as_bytes()),
            None => writer.write_all(b"null"),
        }
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !self.ensure_ascii || fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }
        let mut escaped = String::with_capacity(fragment.len() * 2);
        push_ascii_fragment(&mut escaped, fragment);
        writer.write_all(escaped.as_bytes())
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.open(writer, b"[")
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.close(writer, b"]")
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.begin_value(writer, first)
    }

    fn end_array_value<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.open(writer, b"{")
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.close(writer, b"}")
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.begin_value(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if self.indent.is_some() {
            writer.write_all(b": ")
        } else {
            writer.write_all(b":")
        }
    }

    fn end_object_value<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.has_value = true;
        Ok(())
    }
}

// =============================================================================
// Serialize adapters
// =============================================================================

/// Reduced tree with sorted object keys.
struct Tree<'a>(&'a JsonValue);

impl Serialize for Tree<'_> {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            JsonValue::Null => s.serialize_unit(),
            JsonValue::Bool(b) => s.serialize_bool(*b),
            JsonValue::Int(i) => s.serialize_i64(*i),
            JsonValue::Float(f) => s.serialize_f64(*f),
            JsonValue::String(st) => s.serialize_str(st),
            JsonValue::Array(items) => {
                let mut seq = s.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&Tree(item))?;
                }
                seq.end()
            }
            JsonValue::Object(obj) => {
                let mut entries: Vec<_> = obj.iter().collect();
                entries.sort_by_key(|(k, _)| *k);
                let mut map = s.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, &Tree(value))?;
                }
                map.end()
            }
        }
    }
}

/// Native walk: serde impls for temporal values and UUIDs, no hook.
struct Native<'a> {
    value: &'a Value,
    depth: usize,
}

impl<'a> Native<'a> {
    fn root(value: &'a Value) -> Self {
        Self { value, depth: 0 }
    }

    fn child<'b>(&self, value: &'b Value) -> Native<'b> {
        Native {
            value,
            depth: self.depth + 1,
        }
    }
}

impl Serialize for Native<'_> {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        if self.depth > NATIVE_RECURSION_LIMIT {
            return Err(S::Error::custom("Recursion limit reached"));
        }
        match self.value {
            Value::Null => s.serialize_unit(),
            Value::Bool(b) => s.serialize_bool(*b),
            Value::Int(i) => s.serialize_i64(*i),
            Value::Float(f) => s.serialize_f64(*f),
            Value::String(st) => s.serialize_str(st),
            Value::DateTime(dt) => dt.serialize(s),
            Value::LocalDateTime(dt) => dt.serialize(s),
            Value::Date(d) => d.serialize(s),
            Value::Time(t) => t.serialize(s),
            Value::Uuid(u) => u.serialize(s),
            Value::Enum(member) => self.child(&member.value).serialize(s),
            Value::Map(map) => {
                let entries = map.borrow();
                let mut sorted: Vec<_> = entries.iter().collect();
                sorted.sort_by_key(|(k, _)| *k);
                let mut out = s.serialize_map(Some(sorted.len()))?;
                for (key, value) in sorted {
                    out.serialize_entry(key, &self.child(value))?;
                }
                out.end()
            }
            Value::List(items) | Value::Set(items) => {
                let items = items.borrow();
                let mut seq = s.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(&self.child(item))?;
                }
                seq.end()
            }
            Value::Tuple(items) => {
                let mut seq = s.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&self.child(item))?;
                }
                seq.end()
            }
            Value::Json(tree) => Tree(tree).serialize(s),
            other => Err(S::Error::custom(Error::not_serializable(other.type_name()))),
        }
    }
}

/// Hooked walk: primitives natively, everything else through the serializer.
struct Hooked<'a> {
    value: &'a Value,
    serializer: &'a ValueSerializer,
    failure: &'a RefCell<Option<Error>>,
}

impl Serialize for Hooked<'_> {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        match self.value {
            Value::Null => s.serialize_unit(),
            Value::Bool(b) => s.serialize_bool(*b),
            Value::Int(i) => s.serialize_i64(*i),
            Value::Float(f) => s.serialize_f64(*f),
            Value::String(st) => s.serialize_str(st),
            Value::Json(tree) => Tree(tree).serialize(s),
            other => match self.serializer.convert(other) {
                Ok(tree) => Tree(&tree).serialize(s),
                Err(e) => {
                    let message = e.to_string();
                    *self.failure.borrow_mut() = Some(e);
                    Err(S::Error::custom(message))
                }
            },
        }
    }
}
