//! Typed column storage.
//!
//! A [`Column`] is one field's backing array, sized to the store's row
//! capacity. The element type is fixed at registration ([`ColumnData`]);
//! typed access goes through the [`Element`] trait so callers read and
//! write `f64`, `i64` or `bool` slices without conversions.

use std::fmt;

use inertia_core::{ConfigError, FieldDef, FieldId, Layout, Scalar, ScalarType};
use smallvec::SmallVec;

use crate::error::StoreError;

/// Backing storage of one column.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    /// Float elements.
    Float(Vec<f64>),
    /// Integer elements.
    Int(Vec<i64>),
    /// Boolean elements.
    Bool(Vec<bool>),
}

impl ColumnData {
    /// Allocate `len` elements, all set to `fill`.
    pub fn filled(fill: Scalar, len: usize) -> Self {
        match fill {
            Scalar::Float(v) => Self::Float(vec![v; len]),
            Scalar::Int(v) => Self::Int(vec![v; len]),
            Scalar::Bool(v) => Self::Bool(vec![v; len]),
        }
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Bool(v) => v.len(),
        }
    }

    /// Whether no elements are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element type of this storage.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Self::Float(_) => ScalarType::Float,
            Self::Int(_) => ScalarType::Int,
            Self::Bool(_) => ScalarType::Bool,
        }
    }

    /// Memory usage of the backing storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        match self {
            Self::Float(v) => v.len() * std::mem::size_of::<f64>(),
            Self::Int(v) => v.len() * std::mem::size_of::<i64>(),
            Self::Bool(v) => v.len() * std::mem::size_of::<bool>(),
        }
    }

    fn grow(&mut self, fill: Scalar, layout: Layout, components: usize, old: usize, new: usize) {
        match self {
            Self::Float(v) => {
                let fill = f64::from_scalar(fill).unwrap_or_default();
                grow_vec(v, fill, layout, components, old, new);
            }
            Self::Int(v) => {
                let fill = i64::from_scalar(fill).unwrap_or_default();
                grow_vec(v, fill, layout, components, old, new);
            }
            Self::Bool(v) => {
                let fill = bool::from_scalar(fill).unwrap_or_default();
                grow_vec(v, fill, layout, components, old, new);
            }
        }
    }
}

/// Reallocate `data` from `old` to `new` rows, keeping every row in place.
fn grow_vec<T: Copy>(
    data: &mut Vec<T>,
    fill: T,
    layout: Layout,
    components: usize,
    old: usize,
    new: usize,
) {
    match layout {
        Layout::RowMajor => data.resize(new * components, fill),
        Layout::ComponentMajor => {
            let mut grown = vec![fill; new * components];
            for c in 0..components {
                grown[c * new..c * new + old].copy_from_slice(&data[c * old..(c + 1) * old]);
            }
            *data = grown;
        }
    }
}

/// An element type a column can store.
///
/// Implemented for `f64`, `i64` and `bool`, matching [`ScalarType`].
pub trait Element: Copy + PartialEq + Default + fmt::Debug + 'static {
    /// The scalar type tag of this element.
    const SCALAR: ScalarType;

    /// Extract a value of this type from a tagged scalar.
    fn from_scalar(value: Scalar) -> Option<Self>;

    /// Borrow the column data as a slice of this type.
    fn slice(data: &ColumnData) -> Option<&[Self]>;

    /// Mutably borrow the column data as a slice of this type.
    fn slice_mut(data: &mut ColumnData) -> Option<&mut [Self]>;
}

impl Element for f64 {
    const SCALAR: ScalarType = ScalarType::Float;

    fn from_scalar(value: Scalar) -> Option<Self> {
        match value {
            Scalar::Float(v) => Some(v),
            _ => None,
        }
    }

    fn slice(data: &ColumnData) -> Option<&[Self]> {
        match data {
            ColumnData::Float(v) => Some(v),
            _ => None,
        }
    }

    fn slice_mut(data: &mut ColumnData) -> Option<&mut [Self]> {
        match data {
            ColumnData::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl Element for i64 {
    const SCALAR: ScalarType = ScalarType::Int;

    fn from_scalar(value: Scalar) -> Option<Self> {
        match value {
            Scalar::Int(v) => Some(v),
            _ => None,
        }
    }

    fn slice(data: &ColumnData) -> Option<&[Self]> {
        match data {
            ColumnData::Int(v) => Some(v),
            _ => None,
        }
    }

    fn slice_mut(data: &mut ColumnData) -> Option<&mut [Self]> {
        match data {
            ColumnData::Int(v) => Some(v),
            _ => None,
        }
    }
}

impl Element for bool {
    const SCALAR: ScalarType = ScalarType::Bool;

    fn from_scalar(value: Scalar) -> Option<Self> {
        match value {
            Scalar::Bool(v) => Some(v),
            _ => None,
        }
    }

    fn slice(data: &ColumnData) -> Option<&[Self]> {
        match data {
            ColumnData::Bool(v) => Some(v),
            _ => None,
        }
    }

    fn slice_mut(data: &mut ColumnData) -> Option<&mut [Self]> {
        match data {
            ColumnData::Bool(v) => Some(v),
            _ => None,
        }
    }
}

/// One row's elements, in logical (row-major) component order.
///
/// Nine inline slots cover everything up to a 3x3 matrix without
/// touching the heap.
pub type RowValues<T> = SmallVec<[T; 9]>;

/// One field's storage: its definition plus a capacity-sized array.
#[derive(Clone, Debug)]
pub struct Column {
    def: FieldDef,
    components: usize,
    data: ColumnData,
}

impl Column {
    /// Allocate a column for `capacity` rows, every element at the fill.
    pub(crate) fn new(def: FieldDef, capacity: usize) -> Result<Self, ConfigError> {
        let components = def.components();
        let total = capacity
            .checked_mul(components)
            .ok_or_else(|| ConfigError::InvalidCapacity {
                reason: format!(
                    "capacity ({capacity}) * components ({components}) overflows for field '{}'",
                    def.name,
                ),
            })?;
        let data = ColumnData::filled(def.fill, total);
        Ok(Self {
            def,
            components,
            data,
        })
    }

    /// The field definition this column was registered with.
    pub fn def(&self) -> &FieldDef {
        &self.def
    }

    /// Number of elements per row.
    pub fn components(&self) -> usize {
        self.components
    }

    /// Physical element ordering.
    pub fn layout(&self) -> Layout {
        self.def.shape.layout()
    }

    /// The raw backing storage.
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Flat index of `(row, component)` for a column of `capacity` rows.
    pub fn index(&self, row: usize, component: usize, capacity: usize) -> usize {
        match self.layout() {
            Layout::RowMajor => row * self.components + component,
            Layout::ComponentMajor => component * capacity + row,
        }
    }

    /// Typed view of the whole backing array.
    pub fn typed<T: Element>(&self) -> Option<&[T]> {
        T::slice(&self.data)
    }

    /// Mutable typed view of the whole backing array.
    pub fn typed_mut<T: Element>(&mut self) -> Option<&mut [T]> {
        T::slice_mut(&mut self.data)
    }

    /// Memory usage of the backing storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.data.memory_bytes()
    }

    /// Check a requested element type against the stored one.
    pub(crate) fn check_type<T: Element>(&self, field: FieldId) -> Result<(), StoreError> {
        if self.def.scalar == T::SCALAR {
            Ok(())
        } else {
            Err(StoreError::TypeMismatch {
                field,
                stored: self.def.scalar,
                requested: T::SCALAR,
            })
        }
    }

    /// Reallocate from `old` to `new` rows.
    ///
    /// Existing rows keep their content and logical position; new rows
    /// are set to the fill value.
    pub(crate) fn grow(&mut self, old: usize, new: usize) {
        let layout = self.layout();
        self.data
            .grow(self.def.fill, layout, self.components, old, new);
    }
}
