//! Numeric arrays and tabular data
//!
//! Homogeneous n-dimensional arrays ([`NumericArray`], backed by `ndarray`),
//! data frames of equal-length named columns ([`DataFrame`]) and labeled
//! one-dimensional series ([`Series`]).
//!
//! All three implement [`Structured`] without any capability method: they
//! are recognised by the serializer's converter registry, not by field
//! enumeration.

use crate::error::{Error, Result};
use crate::value::{Structured, Value};
use half::f16;
use ndarray::{Array1, ArrayD, ArrayViewD, IxDyn};
use std::any::Any;

/// A single array element, widened to the largest lossless kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    /// Signed integer (all integer kinds up to 32-bit unsigned, and i64)
    Int(i64),
    /// 64-bit unsigned integer
    UInt(u64),
    /// Floating point (f16 and f32 widened)
    Float(f64),
    /// Boolean
    Bool(bool),
}

/// Element type storable in a [`NumericArray`].
pub trait Element: Copy + 'static {
    /// Widen to a [`Scalar`].
    fn to_scalar(self) -> Scalar;

    /// Wrap an array of this element type.
    fn wrap(array: ArrayD<Self>) -> NumericArray;
}

macro_rules! impl_element {
    ($($ty:ty => $variant:ident, $scalar:ident as $widen:ty, $dtype:literal);* $(;)?) => {
        $(
            impl Element for $ty {
                fn to_scalar(self) -> Scalar {
                    Scalar::$scalar(self as $widen)
                }

                fn wrap(array: ArrayD<Self>) -> NumericArray {
                    NumericArray::$variant(array)
                }
            }
        )*

        impl NumericArray {
            /// Element type name (numpy-style).
            pub fn dtype(&self) -> &'static str {
                match self {
                    $(NumericArray::$variant(_) => $dtype,)*
                    NumericArray::F16(_) => "float16",
                    NumericArray::Bool(_) => "bool",
                }
            }
        }
    };
}

/// Homogeneous n-dimensional numeric array.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericArray {
    /// 8-bit signed integers
    I8(ArrayD<i8>),
    /// 16-bit signed integers
    I16(ArrayD<i16>),
    /// 32-bit signed integers
    I32(ArrayD<i32>),
    /// 64-bit signed integers
    I64(ArrayD<i64>),
    /// 8-bit unsigned integers
    U8(ArrayD<u8>),
    /// 16-bit unsigned integers
    U16(ArrayD<u16>),
    /// 32-bit unsigned integers
    U32(ArrayD<u32>),
    /// 64-bit unsigned integers
    U64(ArrayD<u64>),
    /// 16-bit floats
    F16(ArrayD<f16>),
    /// 32-bit floats
    F32(ArrayD<f32>),
    /// 64-bit floats
    F64(ArrayD<f64>),
    /// Booleans
    Bool(ArrayD<bool>),
}

impl_element! {
    i8 => I8, Int as i64, "int8";
    i16 => I16, Int as i64, "int16";
    i32 => I32, Int as i64, "int32";
    i64 => I64, Int as i64, "int64";
    u8 => U8, Int as i64, "uint8";
    u16 => U16, Int as i64, "uint16";
    u32 => U32, Int as i64, "uint32";
    u64 => U64, UInt as u64, "uint64";
    f32 => F32, Float as f64, "float32";
    f64 => F64, Float as f64, "float64";
}

impl Element for f16 {
    fn to_scalar(self) -> Scalar {
        Scalar::Float(self.to_f64())
    }

    fn wrap(array: ArrayD<Self>) -> NumericArray {
        NumericArray::F16(array)
    }
}

impl Element for bool {
    fn to_scalar(self) -> Scalar {
        Scalar::Bool(self)
    }

    fn wrap(array: ArrayD<Self>) -> NumericArray {
        NumericArray::Bool(array)
    }
}

macro_rules! with_array {
    ($array:expr, $view:ident => $body:expr) => {
        match $array {
            NumericArray::I8(a) => { let $view = a.view(); $body }
            NumericArray::I16(a) => { let $view = a.view(); $body }
            NumericArray::I32(a) => { let $view = a.view(); $body }
            NumericArray::I64(a) => { let $view = a.view(); $body }
            NumericArray::U8(a) => { let $view = a.view(); $body }
            NumericArray::U16(a) => { let $view = a.view(); $body }
            NumericArray::U32(a) => { let $view = a.view(); $body }
            NumericArray::U64(a) => { let $view = a.view(); $body }
            NumericArray::F16(a) => { let $view = a.view(); $body }
            NumericArray::F32(a) => { let $view = a.view(); $body }
            NumericArray::F64(a) => { let $view = a.view(); $body }
            NumericArray::Bool(a) => { let $view = a.view(); $body }
        }
    };
}

impl NumericArray {
    /// One-dimensional array from a vector.
    pub fn from_vec<T: Element>(values: Vec<T>) -> Self {
        T::wrap(Array1::from(values).into_dyn())
    }

    /// Array of any dimensionality.
    pub fn from_array<T: Element>(array: ArrayD<T>) -> Self {
        T::wrap(array)
    }

    /// Zero-dimensional array holding one element.
    pub fn scalar<T: Element>(value: T) -> Self {
        T::wrap(ArrayD::from_elem(IxDyn(&[]), value))
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        with_array!(self, v => v.ndim())
    }

    /// Shape of the array.
    pub fn shape(&self) -> Vec<usize> {
        with_array!(self, v => v.shape().to_vec())
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        with_array!(self, v => v.len())
    }

    /// Check if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index` of a one-dimensional array.
    pub fn get(&self, index: usize) -> Option<Scalar> {
        if self.ndim() != 1 {
            return None;
        }
        with_array!(self, v => v.get(IxDyn(&[index])).map(|x| x.to_scalar()))
    }

    /// Fold the array into a tree: `leaf` maps each element, `node` combines
    /// the results along each axis. A zero-dimensional array is a single leaf.
    pub fn fold<R>(&self, leaf: &impl Fn(Scalar) -> R, node: &impl Fn(Vec<R>) -> R) -> R {
        with_array!(self, v => fold_view(v, leaf, node))
    }
}

fn fold_view<T: Element, R>(
    view: ArrayViewD<'_, T>,
    leaf: &impl Fn(Scalar) -> R,
    node: &impl Fn(Vec<R>) -> R,
) -> R {
    if view.ndim() == 0 {
        // A 0-d view always holds exactly one element
        let value = view.iter().next().copied();
        return match value {
            Some(x) => leaf(x.to_scalar()),
            None => node(Vec::new()),
        };
    }
    let children = view
        .outer_iter()
        .map(|sub| fold_view(sub, leaf, node))
        .collect();
    node(children)
}

impl<T: Element> From<Vec<T>> for NumericArray {
    fn from(values: Vec<T>) -> Self {
        NumericArray::from_vec(values)
    }
}

impl Structured for NumericArray {
    fn type_name(&self) -> &str {
        "ndarray"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// DataFrame
// =============================================================================

/// Named columns of equal-length one-dimensional arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    columns: Vec<(String, NumericArray)>,
    rows: usize,
}

impl DataFrame {
    /// Build a frame, checking that every column is one-dimensional and that
    /// all columns have the same length.
    pub fn new<S, I>(columns: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, NumericArray)>,
    {
        let columns: Vec<(String, NumericArray)> =
            columns.into_iter().map(|(name, col)| (name.into(), col)).collect();

        let mut rows = None;
        for (name, col) in &columns {
            if col.ndim() != 1 {
                return Err(Error::serialization(
                    "DataFrame",
                    format!("column {} has {} dimensions, expected 1", name, col.ndim()),
                ));
            }
            match rows {
                None => rows = Some(col.len()),
                Some(n) if n != col.len() => {
                    return Err(Error::serialization(
                        "DataFrame",
                        format!("column {} has {} rows, expected {}", name, col.len(), n),
                    ));
                }
                Some(_) => {}
            }
        }

        Ok(Self {
            columns,
            rows: rows.unwrap_or(0),
        })
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &NumericArray)> {
        self.columns.iter().map(|(name, col)| (name.as_str(), col))
    }
}

impl Structured for DataFrame {
    fn type_name(&self) -> &str {
        "DataFrame"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Series
// =============================================================================

/// Labeled one-dimensional numeric series.
#[derive(Debug, Clone)]
pub struct Series {
    name: Option<String>,
    index: Option<Vec<Value>>,
    values: NumericArray,
}

impl Series {
    /// Unnamed series with a positional index.
    pub fn new(values: NumericArray) -> Result<Self> {
        if values.ndim() != 1 {
            return Err(Error::serialization(
                "Series",
                format!("series must be one-dimensional, got {} dimensions", values.ndim()),
            ));
        }
        Ok(Self {
            name: None,
            index: None,
            values,
        })
    }

    /// Set the series name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replace the positional index with custom row labels.
    pub fn with_index<V: Into<Value>>(mut self, labels: impl IntoIterator<Item = V>) -> Result<Self> {
        let labels: Vec<Value> = labels.into_iter().map(Into::into).collect();
        if labels.len() != self.values.len() {
            return Err(Error::serialization(
                "Series",
                format!(
                    "index has {} labels but series has {} values",
                    labels.len(),
                    self.values.len()
                ),
            ));
        }
        self.index = Some(labels);
        Ok(self)
    }

    /// Series name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Custom row labels, if any.
    pub fn index(&self) -> Option<&[Value]> {
        self.index.as_deref()
    }

    /// Values of the series.
    pub fn values(&self) -> &NumericArray {
        &self.values
    }
}

impl Structured for Series {
    fn type_name(&self) -> &str {
        "Series"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
