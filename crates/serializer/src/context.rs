//! Traversal context
//!
//! Tracks the identities on the active recursion path, the current depth and
//! the path of keys/indices from the root. A fresh context is created for
//! every top-level conversion and threaded through the recursion by `&mut`.
//!
//! Every acquisition returns a [`Scope`] guard; dropping the guard undoes
//! exactly what was acquired, so the context is restored on success, on
//! policy substitution and on error alike.

use cells_json_core::{Error, Result};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::fmt::Write;
use std::ops::{Deref, DerefMut};

/// One step from a container to a child.
#[derive(Debug, Clone)]
pub(crate) enum Segment {
    /// Mapping key or object field
    Key(String),
    /// Sequence position
    Index(usize),
}

#[derive(Debug)]
pub(crate) struct Traversal {
    ancestors: FxHashSet<usize>,
    path: SmallVec<[Segment; 16]>,
    depth: usize,
    max_depth: usize,
}

impl Traversal {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            ancestors: FxHashSet::default(),
            path: SmallVec::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Check if `identity` is already on the active path.
    pub(crate) fn contains(&self, identity: usize) -> bool {
        self.ancestors.contains(&identity)
    }

    /// Put `identity` on the active path until the returned guard drops.
    pub(crate) fn acquire(&mut self, identity: usize) -> Scope<'_> {
        let inserted = self.ancestors.insert(identity);
        Scope {
            ctx: self,
            identity: inserted.then_some(identity),
            descended: false,
            pushed: false,
        }
    }

    /// Step into a child until the returned guard drops.
    ///
    /// Fails once the depth bound is reached.
    pub(crate) fn child(&mut self, segment: Segment, type_name: &str) -> Result<Scope<'_>> {
        self.check_depth(type_name)?;
        self.depth += 1;
        self.path.push(segment);
        Ok(Scope {
            ctx: self,
            identity: None,
            descended: true,
            pushed: true,
        })
    }

    /// Step into a value that stands for its parent (enum value, converter
    /// or `to_mapping` result). Counts toward depth but adds no path segment.
    pub(crate) fn descend(&mut self, type_name: &str) -> Result<Scope<'_>> {
        self.check_depth(type_name)?;
        self.depth += 1;
        Ok(Scope {
            ctx: self,
            identity: None,
            descended: true,
            pushed: false,
        })
    }

    fn check_depth(&self, type_name: &str) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(Error::serialization(
                type_name,
                format!(
                    "maximum nesting depth of {} exceeded at path: {}",
                    self.max_depth,
                    self.path_string()
                ),
            ));
        }
        Ok(())
    }

    /// Number of identities on the active path.
    pub(crate) fn active(&self) -> usize {
        self.ancestors.len()
    }

    /// Current depth below the root.
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    /// Render the current path, `$` being the root.
    pub(crate) fn path_string(&self) -> String {
        let mut out = String::from("$");
        for segment in &self.path {
            // Writing to a String cannot fail
            let _ = match segment {
                Segment::Key(key) => write!(out, ".{}", key),
                Segment::Index(i) => write!(out, "[{}]", i),
            };
        }
        out
    }
}

/// Guard releasing what a [`Traversal`] acquisition took.
pub(crate) struct Scope<'a> {
    ctx: &'a mut Traversal,
    identity: Option<usize>,
    descended: bool,
    pushed: bool,
}

impl Deref for Scope<'_> {
    type Target = Traversal;

    fn deref(&self) -> &Traversal {
        self.ctx
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut Traversal {
        self.ctx
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        if let Some(identity) = self.identity {
            self.ctx.ancestors.remove(&identity);
        }
        if self.pushed {
            self.ctx.path.pop();
        }
        if self.descended {
            self.ctx.depth -= 1;
        }
    }
}
