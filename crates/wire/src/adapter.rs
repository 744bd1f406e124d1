//! Backend adapter
//!
//! [`BackendAdapter`] puts the text backend and the accelerated backend
//! behind one contract. The backend is chosen once, when the adapter is
//! built:
//!
//! | Requested | `accelerated` feature on | feature off |
//! |-----------|--------------------------|-------------|
//! | `Auto` | accelerated | text |
//! | `Text` | text | text |
//! | `Accelerated` | accelerated | configuration error |
//!
//! The text backend returns [`Encoded::Text`], the accelerated backend
//! [`Encoded::Binary`] (UTF-8 JSON bytes).

#[cfg(feature = "accelerated")]
use crate::accelerated::AcceleratedBackend;
use crate::format::EncodeOptions;
use crate::text::TextBackend;
use cells_json_core::{Error, JsonValue, Result, Value};
use cells_json_serializer::ValueSerializer;
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Requested backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Accelerated when compiled in, text otherwise
    #[default]
    Auto,
    /// Hand-written text codec
    Text,
    /// serde_json codec
    Accelerated,
}

impl BackendKind {
    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Auto => "auto",
            BackendKind::Text => "text",
            BackendKind::Accelerated => "accelerated",
        }
    }

    /// Whether the accelerated backend is compiled in.
    pub fn accelerated_available() -> bool {
        cfg!(feature = "accelerated")
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(BackendKind::Auto),
            "text" | "json" => Ok(BackendKind::Text),
            "accelerated" | "native" => Ok(BackendKind::Accelerated),
            other => Err(Error::Config(format!("Unsupported backend: {}", other))),
        }
    }
}

/// Encoder output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    /// JSON text from the text backend
    Text(String),
    /// UTF-8 JSON bytes from the accelerated backend
    Binary(Vec<u8>),
}

impl Encoded {
    /// Borrow the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Encoded::Text(s) => s.as_bytes(),
            Encoded::Binary(b) => b,
        }
    }

    /// Convert to a `String`.
    pub fn into_string(self) -> Result<String> {
        match self {
            Encoded::Text(s) => Ok(s),
            Encoded::Binary(b) => String::from_utf8(b).map_err(|e| Error::Backend {
                backend: "accelerated",
                message: format!("output is not valid UTF-8: {}", e),
            }),
        }
    }

    /// Convert to bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Encoded::Text(s) => s.into_bytes(),
            Encoded::Binary(b) => b,
        }
    }

    /// Check if this is text output.
    pub fn is_text(&self) -> bool {
        matches!(self, Encoded::Text(_))
    }
}

enum Backend {
    Text(TextBackend),
    #[cfg(feature = "accelerated")]
    Accelerated(AcceleratedBackend),
}

/// Uniform encode/decode over the selected backend.
pub struct BackendAdapter {
    backend: Backend,
    requested: BackendKind,
}

impl BackendAdapter {
    /// Adapter with default settings (auto backend, native types on).
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Start configuring an adapter.
    pub fn builder() -> BackendAdapterBuilder {
        BackendAdapterBuilder::new()
    }

    /// Backend that was requested.
    pub fn requested(&self) -> BackendKind {
        self.requested
    }

    /// Backend actually in use (`Text` or `Accelerated`).
    pub fn selected(&self) -> BackendKind {
        match &self.backend {
            Backend::Text(_) => BackendKind::Text,
            #[cfg(feature = "accelerated")]
            Backend::Accelerated(_) => BackendKind::Accelerated,
        }
    }

    /// Encode a value.
    pub fn encode(&self, value: &Value) -> Result<Encoded> {
        match &self.backend {
            Backend::Text(text) => text.encode(value).map(Encoded::Text),
            #[cfg(feature = "accelerated")]
            Backend::Accelerated(acc) => acc.encode(value).map(Encoded::Binary),
        }
    }

    /// Encode a value into a writer. Nothing is written when encoding fails.
    pub fn encode_to_sink<W: Write>(&self, value: &Value, sink: &mut W) -> Result<()> {
        match &self.backend {
            Backend::Text(text) => {
                let encoded = text.encode(value)?;
                sink.write_all(encoded.as_bytes())?;
            }
            #[cfg(feature = "accelerated")]
            Backend::Accelerated(acc) => {
                let encoded = acc.encode(value)?;
                sink.write_all(&encoded)?;
            }
        }
        Ok(())
    }

    /// Decode JSON text or bytes into a tree.
    pub fn decode(&self, input: &[u8]) -> Result<JsonValue> {
        match &self.backend {
            Backend::Text(text) => text.decode(input),
            #[cfg(feature = "accelerated")]
            Backend::Accelerated(acc) => acc.decode(input),
        }
    }

    /// Decode JSON read from a source.
    pub fn decode_from_source<R: Read>(&self, mut source: R) -> Result<JsonValue> {
        match &self.backend {
            Backend::Text(text) => {
                let mut buf = Vec::new();
                source.read_to_end(&mut buf)?;
                text.decode(&buf)
            }
            #[cfg(feature = "accelerated")]
            Backend::Accelerated(acc) => acc.decode_from(source),
        }
    }
}

impl fmt::Debug for BackendAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendAdapter")
            .field("requested", &self.requested)
            .field("selected", &self.selected())
            .finish()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`BackendAdapter`].
///
/// # Example
///
/// ```
/// use cells_json_wire::{BackendAdapter, BackendKind};
///
/// let adapter = BackendAdapter::builder()
///     .backend(BackendKind::Text)
///     .indent(2)
///     .build()
///     .unwrap();
/// assert_eq!(adapter.selected(), BackendKind::Text);
/// ```
pub struct BackendAdapterBuilder {
    backend: BackendKind,
    native_types: bool,
    options: EncodeOptions,
    serializer: Option<Arc<ValueSerializer>>,
}

impl BackendAdapterBuilder {
    /// Auto backend, native types on, compact UTF-8 output.
    pub fn new() -> Self {
        Self {
            backend: BackendKind::Auto,
            native_types: true,
            options: EncodeOptions::default(),
            serializer: None,
        }
    }

    /// Requested backend.
    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Requested backend by name (`auto`, `text`/`json`, `accelerated`/`native`).
    pub fn backend_name(mut self, name: &str) -> Result<Self> {
        self.backend = name.parse()?;
        Ok(self)
    }

    /// Let the accelerated backend encode temporal values, UUIDs and
    /// containers itself. When off, every non-primitive value goes through
    /// the serializer.
    pub fn native_types(mut self, native_types: bool) -> Self {
        self.native_types = native_types;
        self
    }

    /// Escape non-ASCII characters.
    pub fn ensure_ascii(mut self, ensure_ascii: bool) -> Self {
        self.options.ensure_ascii = ensure_ascii;
        self
    }

    /// Pretty-print with `indent` spaces per level.
    pub fn indent(mut self, indent: usize) -> Self {
        self.options.indent = Some(indent);
        self
    }

    /// Replace all encode options.
    pub fn options(mut self, options: EncodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Serializer used for pre-walks and hooks.
    pub fn serializer(mut self, serializer: ValueSerializer) -> Self {
        self.serializer = Some(Arc::new(serializer));
        self
    }

    /// Share an existing serializer.
    pub fn shared_serializer(mut self, serializer: Arc<ValueSerializer>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    /// Resolve the backend and build the adapter.
    pub fn build(self) -> Result<BackendAdapter> {
        let serializer = self
            .serializer
            .unwrap_or_else(|| Arc::new(ValueSerializer::new()));
        let backend = resolve(self.backend, serializer, self.options, self.native_types)?;
        let adapter = BackendAdapter {
            backend,
            requested: self.backend,
        };
        debug!(
            requested = %adapter.requested,
            selected = %adapter.selected(),
            native_types = self.native_types,
            "Backend selected"
        );
        Ok(adapter)
    }
}

impl Default for BackendAdapterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "accelerated")]
fn resolve(
    kind: BackendKind,
    serializer: Arc<ValueSerializer>,
    options: EncodeOptions,
    native_types: bool,
) -> Result<Backend> {
    Ok(match kind {
        BackendKind::Text => Backend::Text(TextBackend::new(serializer, options)),
        BackendKind::Auto | BackendKind::Accelerated => {
            Backend::Accelerated(AcceleratedBackend::new(serializer, options, native_types))
        }
    })
}

#[cfg(not(feature = "accelerated"))]
fn resolve(
    kind: BackendKind,
    serializer: Arc<ValueSerializer>,
    options: EncodeOptions,
    _native_types: bool,
) -> Result<Backend> {
    match kind {
        BackendKind::Auto | BackendKind::Text => Ok(Backend::Text(TextBackend::new(serializer, options))),
        BackendKind::Accelerated => Err(Error::Config(
            "accelerated backend is not available in this build".to_string(),
        )),
    }
}
