//! One-call helpers over a process-wide default adapter.

use cells_json_core::{JsonValue, Result, Value};
use cells_json_serializer::ValueSerializer;
use cells_json_wire::{BackendAdapter, EncodeOptions, Encoded, TextBackend};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::debug;

static DEFAULT_ADAPTER: OnceCell<BackendAdapter> = OnceCell::new();
static HOOKED_ADAPTER: OnceCell<BackendAdapter> = OnceCell::new();
static DEFAULT_SERIALIZER: OnceCell<Arc<ValueSerializer>> = OnceCell::new();

fn default_adapter() -> Result<&'static BackendAdapter> {
    DEFAULT_ADAPTER.get_or_try_init(|| {
        BackendAdapter::builder()
            .shared_serializer(default_serializer())
            .native_types(true)
            .build()
    })
}

/// Auto adapter with every non-primitive value routed through the serializer.
pub(crate) fn hooked_adapter() -> Result<&'static BackendAdapter> {
    HOOKED_ADAPTER.get_or_try_init(|| {
        BackendAdapter::builder()
            .shared_serializer(default_serializer())
            .native_types(false)
            .build()
    })
}

fn default_serializer() -> Arc<ValueSerializer> {
    DEFAULT_SERIALIZER
        .get_or_init(|| Arc::new(ValueSerializer::new()))
        .clone()
}

/// Encode a value with the default adapter (auto backend, native types on).
///
/// Returns [`Encoded::Binary`] when the accelerated backend is compiled in,
/// [`Encoded::Text`] otherwise.
pub fn dumps(value: &Value) -> Result<Encoded> {
    default_adapter()?.encode(value)
}

/// Decode JSON text or bytes with the default adapter.
pub fn loads(input: &[u8]) -> Result<JsonValue> {
    default_adapter()?.decode(input)
}

/// Options for [`safe_dumps`].
#[derive(Debug, Clone)]
pub struct SafeOptions {
    /// Raise on circular references instead of writing a sentinel
    pub fail_on_circular: bool,
    /// Return `default_value` instead of a serialization error
    pub ignore_errors: bool,
    /// Text returned when a serialization error is ignored
    pub default_value: String,
}

impl Default for SafeOptions {
    fn default() -> Self {
        Self {
            fail_on_circular: true,
            ignore_errors: false,
            default_value: "null".to_string(),
        }
    }
}

/// Encode a value as JSON text on the text backend.
///
/// Circular references are fatal unless `options.fail_on_circular` is off.
/// With `options.ignore_errors`, any serialization-family failure yields
/// `options.default_value`.
///
/// # Example
///
/// ```
/// use cells_json::{safe_dumps, Mapping, SafeOptions, Value};
///
/// let map = Mapping::new();
/// map.insert("self", Value::Map(map.clone()));
///
/// assert!(safe_dumps(&Value::Map(map.clone()), &SafeOptions::default()).is_err());
///
/// let lenient = SafeOptions { ignore_errors: true, ..SafeOptions::default() };
/// assert_eq!(safe_dumps(&Value::Map(map.clone()), &lenient).unwrap(), "null");
/// # map.borrow_mut().clear();
/// ```
pub fn safe_dumps(value: &Value, options: &SafeOptions) -> Result<String> {
    let serializer = ValueSerializer::builder()
        .fail_on_circular(options.fail_on_circular)
        .build()?;
    let backend = TextBackend::new(Arc::new(serializer), EncodeOptions::compact());

    match backend.encode(value) {
        Err(e) if options.ignore_errors && e.is_serialization() => {
            debug!(error = %e, "Serialization failed, returning default value");
            Ok(options.default_value.clone())
        }
        result => result,
    }
}

/// Encode a value as indented JSON text.
pub fn prettify(value: &Value, indent: usize) -> Result<String> {
    TextBackend::new(default_serializer(), EncodeOptions::pretty(indent)).encode(value)
}
