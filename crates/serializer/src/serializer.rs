//! Recursive, policy-driven value serializer
//!
//! [`ValueSerializer::convert`] reduces any [`Value`] to a [`JsonValue`] tree.
//! Rules are tried in a fixed order and the first match wins:
//!
//! | Input | Output |
//! |-------|--------|
//! | null, bool, int, float, string, JSON tree | unchanged |
//! | date-time | `YYYY-MM-DDTHH:MM:SS[.ffffff][+HH:MM]` |
//! | date / time | `YYYY-MM-DD` / `HH:MM:SS[.ffffff]` |
//! | duration | total seconds as float |
//! | decimal | nearest float |
//! | uuid | lowercase hyphenated string |
//! | enum member | its underlying value, converted |
//! | path | string with `/` separators |
//! | registered object (arrays, frames, series) | converter output, converted |
//! | map | object, values converted |
//! | list, tuple, set | array, elements converted |
//! | other object | `to_mapping`, then `fields`, then the unresolved chain |
//!
//! Maps, lists, sets and objects are checked for cycles on entry. A value
//! already on the active path either fails with
//! [`Error::CircularReference`] or renders as `"<CircularReference Type>"`,
//! depending on the policy.

use crate::context::{Segment, Traversal};
use crate::policy::{FallbackFn, OnCircular, Policy, Unresolved};
use crate::registry::{ConverterRegistry, TypeConverter};
use crate::temporal;
use cells_json_core::{Error, Fields, JsonValue, Result, Structured, Value};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Default bound on nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 256;

const CAPABILITY_HINT: &str = "Implement Structured::to_mapping or Structured::fields";

/// Converts values to JSON trees under a fixed [`Policy`].
///
/// The serializer holds no per-call state; it can be shared between threads
/// and reused for any number of conversions.
pub struct ValueSerializer {
    policy: Policy,
    registry: ConverterRegistry,
    max_depth: usize,
}

impl ValueSerializer {
    /// Lenient serializer with the default converters.
    pub fn new() -> Self {
        Self {
            policy: Policy::default(),
            registry: ConverterRegistry::with_defaults(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Start configuring a serializer.
    pub fn builder() -> ValueSerializerBuilder {
        ValueSerializerBuilder::new()
    }

    /// Policy this serializer was built with.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Maximum nesting depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Reduce `value` to a JSON tree.
    pub fn convert(&self, value: &Value) -> Result<JsonValue> {
        let mut ctx = Traversal::new(self.max_depth);
        let result = self.walk(value, &mut ctx);
        debug_assert_eq!(ctx.active(), 0, "identities leaked from traversal");
        debug_assert_eq!(ctx.depth(), 0, "path segments leaked from traversal");
        result
    }

    fn walk(&self, value: &Value, ctx: &mut Traversal) -> Result<JsonValue> {
        match value {
            Value::Null => Ok(JsonValue::Null),
            Value::Bool(b) => Ok(JsonValue::Bool(*b)),
            Value::Int(i) => Ok(JsonValue::Int(*i)),
            Value::Float(f) => Ok(JsonValue::Float(*f)),
            Value::String(s) => Ok(JsonValue::String(s.clone())),
            Value::Json(json) => Ok(json.clone()),

            Value::DateTime(dt) => Ok(JsonValue::String(temporal::iso_datetime(dt))),
            Value::LocalDateTime(dt) => Ok(JsonValue::String(temporal::iso_local_datetime(dt))),
            Value::Date(d) => Ok(JsonValue::String(temporal::iso_date(d))),
            Value::Time(t) => Ok(JsonValue::String(temporal::iso_time(t))),
            Value::Duration(d) => Ok(JsonValue::Float(temporal::total_seconds(d))),

            Value::Decimal(d) => decimal_to_f64(d).map(JsonValue::Float),
            Value::Uuid(u) => Ok(JsonValue::String(u.hyphenated().to_string())),
            Value::Enum(member) => {
                let mut scope = ctx.descend(&member.type_name)?;
                self.walk(&member.value, &mut scope)
            }
            Value::Path(p) => Ok(JsonValue::String(portable_path(p))),

            Value::Map(map) => {
                self.with_identity(value, ctx, |ctx| self.walk_entries(&map.borrow(), ctx))
            }
            Value::List(items) | Value::Set(items) => {
                self.with_identity(value, ctx, |ctx| self.walk_items(&items.borrow(), ctx))
            }
            Value::Tuple(items) => self.walk_items(items, ctx),
            Value::Object(obj) => {
                self.with_identity(value, ctx, |ctx| self.walk_object(value, obj.as_ref(), ctx))
            }
        }
    }

    /// Run `body` with the value's identity on the active path.
    fn with_identity<F>(&self, value: &Value, ctx: &mut Traversal, body: F) -> Result<JsonValue>
    where
        F: FnOnce(&mut Traversal) -> Result<JsonValue>,
    {
        let Some(identity) = value.identity() else {
            return body(ctx);
        };
        if ctx.contains(identity) {
            return self.on_cycle(value.type_name(), ctx);
        }
        let mut scope = ctx.acquire(identity);
        body(&mut *scope)
    }

    fn on_cycle(&self, type_name: &str, ctx: &Traversal) -> Result<JsonValue> {
        match self.policy.on_circular() {
            OnCircular::Fail => Err(Error::CircularReference {
                type_name: type_name.to_string(),
                path: ctx.path_string(),
            }),
            OnCircular::Sentinel => {
                warn!(
                    type_name,
                    path = %ctx.path_string(),
                    "Circular reference replaced by sentinel"
                );
                Ok(JsonValue::String(format!("<CircularReference {}>", type_name)))
            }
        }
    }

    fn walk_entries(&self, entries: &HashMap<String, Value>, ctx: &mut Traversal) -> Result<JsonValue> {
        let mut out = HashMap::with_capacity(entries.len());
        for (key, child) in entries {
            let mut scope = ctx.child(Segment::Key(key.clone()), child.type_name())?;
            out.insert(key.clone(), self.walk(child, &mut scope)?);
        }
        Ok(JsonValue::Object(out))
    }

    fn walk_items(&self, items: &[Value], ctx: &mut Traversal) -> Result<JsonValue> {
        let mut out = Vec::with_capacity(items.len());
        for (i, child) in items.iter().enumerate() {
            let mut scope = ctx.child(Segment::Index(i), child.type_name())?;
            out.push(self.walk(child, &mut scope)?);
        }
        Ok(JsonValue::Array(out))
    }

    fn walk_object(&self, value: &Value, obj: &dyn Structured, ctx: &mut Traversal) -> Result<JsonValue> {
        if let Some((converter, result)) = self.registry.convert(obj) {
            trace!(converter, type_name = obj.type_name(), "Registry converter matched");
            let converted = result?;
            let mut scope = ctx.descend(obj.type_name())?;
            return self.walk(&converted, &mut scope);
        }
        match self.probe_object(obj, ctx)? {
            Some(json) => Ok(json),
            None => self.resolve_unresolved(value),
        }
    }

    /// Convert through the object's capabilities; `None` when it has none.
    fn probe_object(&self, obj: &dyn Structured, ctx: &mut Traversal) -> Result<Option<JsonValue>> {
        if let Some(mapped) = obj.to_mapping() {
            let mut scope = ctx.descend(obj.type_name())?;
            return self.walk(&mapped, &mut scope).map(Some);
        }
        match obj.fields() {
            Some(Fields::Dynamic(attrs)) => self.walk_entries(&attrs, ctx).map(Some),
            Some(Fields::Declared(slots)) => {
                let mut out = HashMap::with_capacity(slots.len());
                for (name, slot) in slots {
                    // Unset slots are skipped
                    let Some(child) = slot else { continue };
                    let mut scope = ctx.child(Segment::Key(name.to_string()), child.type_name())?;
                    out.insert(name.to_string(), self.walk(&child, &mut scope)?);
                }
                Ok(Some(JsonValue::Object(out)))
            }
            None => Ok(None),
        }
    }

    fn resolve_unresolved(&self, value: &Value) -> Result<JsonValue> {
        let type_name = value.type_name();
        match self.policy.unresolved() {
            Unresolved::Propagate => Err(Error::unsupported(type_name, Some(CAPABILITY_HINT))),
            Unresolved::Null => {
                debug!(type_name, "Unsupported value replaced by null");
                Ok(JsonValue::Null)
            }
            Unresolved::Fallback(fallback) => {
                debug!(type_name, "Unsupported value passed to fallback");
                fallback(value)
            }
        }
    }
}

impl Default for ValueSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValueSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueSerializer")
            .field("policy", &self.policy)
            .field("converters", &self.registry.names())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

fn decimal_to_f64(d: &Decimal) -> Result<f64> {
    // The string round trip is correctly rounded, unlike to_f64
    d.to_string()
        .parse::<f64>()
        .ok()
        .or_else(|| d.to_f64())
        .ok_or_else(|| Error::serialization("Decimal", format!("Decimal {} has no float representation", d)))
}

fn portable_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, "/")
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`ValueSerializer`].
///
/// # Example
///
/// ```
/// use cells_json_serializer::ValueSerializer;
///
/// let serializer = ValueSerializer::builder()
///     .ignore_unknown(true)
///     .fail_on_circular(true)
///     .build()
///     .unwrap();
/// assert!(serializer.policy().ignores_unknown());
/// ```
pub struct ValueSerializerBuilder {
    policy: Policy,
    registry: ConverterRegistry,
    max_depth: usize,
}

impl ValueSerializerBuilder {
    /// Lenient policy, default converters, default depth bound.
    pub fn new() -> Self {
        Self {
            policy: Policy::default(),
            registry: ConverterRegistry::with_defaults(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Unresolved values always fail.
    pub fn strict(mut self, strict: bool) -> Self {
        self.policy.strict = strict;
        self
    }

    /// Unresolved values become null (unless strict).
    pub fn ignore_unknown(mut self, ignore: bool) -> Self {
        self.policy.ignore_unknown = ignore;
        self
    }

    /// Cycles fail instead of rendering the sentinel string.
    pub fn fail_on_circular(mut self, fail: bool) -> Self {
        self.policy.fail_on_circular = fail;
        self
    }

    /// Converter consulted for unresolved values when neither strict nor
    /// ignoring unknowns. Its result is used as-is.
    pub fn fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fn(&Value) -> Result<JsonValue> + Send + Sync + 'static,
    {
        self.policy.fallback = Some(Arc::new(fallback) as FallbackFn);
        self
    }

    /// Bound on nesting depth.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Register an additional object converter, consulted after the defaults.
    pub fn register<C: TypeConverter + 'static>(mut self, converter: C) -> Self {
        self.registry.register(converter);
        self
    }

    /// Drop the default converters.
    pub fn without_default_converters(mut self) -> Self {
        self.registry = ConverterRegistry::new();
        self
    }

    /// Build the serializer.
    pub fn build(self) -> Result<ValueSerializer> {
        if self.max_depth == 0 {
            return Err(Error::Config("max_depth must be at least 1".to_string()));
        }
        Ok(ValueSerializer {
            policy: self.policy,
            registry: self.registry,
            max_depth: self.max_depth,
        })
    }
}

impl Default for ValueSerializerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
