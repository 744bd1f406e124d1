//! Input value model for cells-json
//!
//! [`Value`] is the closed universe of things the serializer accepts. Shared
//! containers ([`Mapping`], [`Sequence`]) and opaque objects carry an identity
//! (their `Rc` allocation) so that a value graph may contain cycles, exactly
//! like the object graphs it models:
//!
//! ```
//! use cells_json_core::{Mapping, Value};
//!
//! let map = Mapping::new();
//! map.insert("self", Value::Map(map.clone()));
//! assert_eq!(map.len(), 1);
//! ```
//!
//! Values are `!Send`; they are built, converted and dropped on one thread.

use crate::json::JsonValue;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use uuid::Uuid;

/// Any value the serializer can be asked to convert.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absence of value
    Null,

    /// Boolean true or false
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit IEEE-754 floating point
    Float(f64),

    /// UTF-8 encoded string
    String(String),

    /// Temporal instant with a UTC offset
    DateTime(DateTime<FixedOffset>),

    /// Date and time of day without an offset
    LocalDateTime(NaiveDateTime),

    /// Calendar date
    Date(NaiveDate),

    /// Time of day
    Time(NaiveTime),

    /// Signed duration
    Duration(chrono::Duration),

    /// Arbitrary-precision decimal
    Decimal(Decimal),

    /// Unique identifier
    Uuid(Uuid),

    /// Enumerated constant
    Enum(EnumMember),

    /// Filesystem path
    Path(PathBuf),

    /// Shared string-keyed mapping
    Map(Mapping),

    /// Shared ordered sequence
    List(Sequence),

    /// Fixed-size tuple
    Tuple(Vec<Value>),

    /// Shared unordered collection
    Set(Sequence),

    /// Opaque user-defined object
    Object(Rc<dyn Structured>),

    /// Already-reduced JSON tree
    Json(JsonValue),
}

impl Value {
    /// Returns the runtime type name (for error messages and cycle sentinels)
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::DateTime(_) => "DateTime",
            Value::LocalDateTime(_) => "LocalDateTime",
            Value::Date(_) => "Date",
            Value::Time(_) => "Time",
            Value::Duration(_) => "Duration",
            Value::Decimal(_) => "Decimal",
            Value::Uuid(_) => "Uuid",
            Value::Enum(member) => member.type_name.as_str(),
            Value::Path(_) => "Path",
            Value::Map(_) => "Map",
            Value::List(_) => "List",
            Value::Tuple(_) => "Tuple",
            Value::Set(_) => "Set",
            Value::Object(obj) => obj.type_name(),
            Value::Json(json) => json.type_name(),
        }
    }

    /// Identity of an identity-bearing value (map, list, set, object).
    ///
    /// Two values share an identity iff they point at the same allocation.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Map(m) => Some(m.identity()),
            Value::List(s) | Value::Set(s) => Some(s.identity()),
            Value::Object(obj) => Some(Rc::as_ptr(obj) as *const () as usize),
            _ => None,
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Wrap a [`Structured`] implementation as an opaque object.
    pub fn object<T: Structured>(obj: T) -> Self {
        Value::Object(Rc::new(obj))
    }

    /// Build a shared mapping from key/value pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(entries.into_iter().collect())
    }

    /// Build a shared list.
    pub fn list<V: Into<Value>, I: IntoIterator<Item = V>>(items: I) -> Self {
        Value::List(items.into_iter().collect())
    }

    /// Build a tuple.
    pub fn tuple<V: Into<Value>, I: IntoIterator<Item = V>>(items: I) -> Self {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Build a shared unordered collection.
    pub fn set<V: Into<Value>, I: IntoIterator<Item = V>>(items: I) -> Self {
        Value::Set(items.into_iter().collect())
    }
}

/// Member of an enumeration: serializes as its underlying value.
#[derive(Debug, Clone)]
pub struct EnumMember {
    /// Name of the enumeration type
    pub type_name: String,
    /// Name of the member
    pub name: String,
    /// Underlying scalar value
    pub value: Box<Value>,
}

impl EnumMember {
    /// Create an enum member.
    pub fn new(
        type_name: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            value: Box::new(value.into()),
        }
    }
}

// =============================================================================
// Shared containers
// =============================================================================

/// Shared, mutable string-keyed mapping.
///
/// Cloning a `Mapping` clones the handle, not the entries.
#[derive(Clone, Default)]
pub struct Mapping(Rc<RefCell<HashMap<String, Value>>>);

impl Mapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the previous value for the key.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.borrow_mut().insert(key.into(), value.into())
    }

    /// Clone out the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Check if the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Borrow the entries.
    pub fn borrow(&self) -> Ref<'_, HashMap<String, Value>> {
        self.0.borrow()
    }

    /// Mutably borrow the entries.
    pub fn borrow_mut(&self) -> RefMut<'_, HashMap<String, Value>> {
        self.0.borrow_mut()
    }

    /// Allocation address, stable for the lifetime of the mapping.
    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Mapping(Rc::new(RefCell::new(entries)))
    }
}

// Entries are not printed: a mapping may contain itself.
impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mapping({:#x}, len={})", self.identity(), self.len())
    }
}

/// Shared, mutable ordered sequence. Also backs unordered sets.
#[derive(Clone, Default)]
pub struct Sequence(Rc<RefCell<Vec<Value>>>);

impl Sequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element.
    pub fn push(&self, value: impl Into<Value>) {
        self.0.borrow_mut().push(value.into());
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Check if the sequence has no elements.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Borrow the elements.
    pub fn borrow(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }

    /// Allocation address, stable for the lifetime of the sequence.
    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl<V: Into<Value>> FromIterator<V> for Sequence {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Sequence(Rc::new(RefCell::new(iter.into_iter().map(Into::into).collect())))
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sequence({:#x}, len={})", self.identity(), self.len())
    }
}

// =============================================================================
// Structured capability
// =============================================================================

/// Field set exposed by an opaque object.
#[derive(Debug, Clone)]
pub enum Fields {
    /// Attribute table built at runtime
    Dynamic(HashMap<String, Value>),
    /// Fixed declared field list; `None` marks an unset field, which is skipped
    Declared(Vec<(&'static str, Option<Value>)>),
}

/// Capability an opaque object implements to become serializable.
///
/// Conversion tries [`to_mapping`](Structured::to_mapping) first, then
/// [`fields`](Structured::fields). An object offering neither is unsupported.
///
/// ```
/// use cells_json_core::{Fields, Structured, Value};
/// use std::any::Any;
///
/// struct Point { x: i64, y: i64 }
///
/// impl Structured for Point {
///     fn fields(&self) -> Option<Fields> {
///         Some(Fields::Declared(vec![
///             ("x", Some(Value::Int(self.x))),
///             ("y", Some(Value::Int(self.y))),
///         ]))
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let point = Value::object(Point { x: 1, y: 2 });
/// assert_eq!(point.type_name(), "Point");
/// ```
pub trait Structured: Any {
    /// Runtime type name. Defaults to the unqualified Rust type name.
    fn type_name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Zero-argument "to mapping" conversion.
    fn to_mapping(&self) -> Option<Value> {
        None
    }

    /// Enumerable field set.
    fn fields(&self) -> Option<Fields> {
        None
    }

    /// Upcast for downcasting by converters.
    fn as_any(&self) -> &dyn Any;
}

impl fmt::Debug for dyn Structured {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.type_name())
    }
}

/// Strip the module path and generic arguments from a Rust type name.
///
/// `alloc::vec::Vec<u8>` becomes `Vec`, `my_app::model::User` becomes `User`.
pub fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

// =============================================================================
// Conversions
// =============================================================================

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => String,
    &str => String,
    DateTime<FixedOffset> => DateTime,
    NaiveDateTime => LocalDateTime,
    NaiveDate => Date,
    NaiveTime => Time,
    chrono::Duration => Duration,
    Decimal => Decimal,
    Uuid => Uuid,
    EnumMember => Enum,
    PathBuf => Path,
    &Path => Path,
    Mapping => Map,
    Sequence => List,
    JsonValue => Json,
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
