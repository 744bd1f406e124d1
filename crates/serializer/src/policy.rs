//! Strictness policy
//!
//! A [`Policy`] is fixed when the serializer is built. Its flags are
//! independent, but exactly one [`Unresolved`] strategy applies to a value
//! no rule can handle, chosen in this order:
//!
//! 1. `strict` → propagate the failure
//! 2. `ignore_unknown` → substitute null
//! 3. `fallback` configured → use the fallback's result verbatim
//! 4. otherwise → propagate the failure

use cells_json_core::{JsonValue, Result, Value};
use std::fmt;
use std::sync::Arc;

/// Custom converter consulted last for unresolved values.
pub type FallbackFn = Arc<dyn Fn(&Value) -> Result<JsonValue> + Send + Sync>;

/// Strictness configuration of a serializer.
#[derive(Clone, Default)]
pub struct Policy {
    pub(crate) strict: bool,
    pub(crate) ignore_unknown: bool,
    pub(crate) fail_on_circular: bool,
    pub(crate) fallback: Option<FallbackFn>,
}

/// What happens to a value no rule can convert.
pub enum Unresolved<'a> {
    /// Fail with `Unsupported`
    Propagate,
    /// Replace with null
    Null,
    /// Call the fallback and use its result as-is
    Fallback(&'a FallbackFn),
}

/// What happens when a value turns out to be its own ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnCircular {
    /// Fail with `CircularReference`
    Fail,
    /// Render the `<CircularReference TypeName>` sentinel string
    Sentinel,
}

impl Policy {
    /// Unresolved values are fatal.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Unresolved values become null.
    pub fn ignores_unknown(&self) -> bool {
        self.ignore_unknown
    }

    /// Whether a fallback converter is configured.
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Strategy applied to unresolved values.
    pub fn unresolved(&self) -> Unresolved<'_> {
        if self.strict {
            return Unresolved::Propagate;
        }
        if self.ignore_unknown {
            return Unresolved::Null;
        }
        match &self.fallback {
            Some(fallback) => Unresolved::Fallback(fallback),
            None => Unresolved::Propagate,
        }
    }

    /// Strategy applied to cycles.
    pub fn on_circular(&self) -> OnCircular {
        if self.fail_on_circular {
            OnCircular::Fail
        } else {
            OnCircular::Sentinel
        }
    }
}

impl fmt::Debug for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy")
            .field("strict", &self.strict)
            .field("ignore_unknown", &self.ignore_unknown)
            .field("fail_on_circular", &self.fail_on_circular)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
