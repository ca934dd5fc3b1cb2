//! Field descriptors: element shapes, scalar types and fill values.
//!
//! A [`FieldDef`] describes one column of a columnar store. The element
//! shape of a row is classified into a [`FieldShape`], which in turn
//! derives the physical shape of the whole column for a given row
//! capacity.

use std::fmt;

use smallvec::{smallvec, SmallVec};

use crate::error::ConfigError;

/// Declared element dimensions of a field.
///
/// Up to rank 4 stays inline, which covers every shape but large tensors.
pub type ShapeDims = SmallVec<[u32; 4]>;

/// Element type stored in a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// 64-bit IEEE float.
    Float,
    /// 64-bit signed integer.
    Int,
    /// Boolean flag.
    Bool,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => write!(f, "float"),
            Self::Int => write!(f, "int"),
            Self::Bool => write!(f, "bool"),
        }
    }
}

/// A single element value, tagged with its [`ScalarType`].
///
/// Used for fill values: every element of a freshly allocated row is set
/// to its field's fill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    /// A float element.
    Float(f64),
    /// An integer element.
    Int(i64),
    /// A boolean element.
    Bool(bool),
}

impl Scalar {
    /// The zero value of a scalar type (`0.0`, `0` or `false`).
    pub fn zero(scalar_type: ScalarType) -> Self {
        match scalar_type {
            ScalarType::Float => Self::Float(0.0),
            ScalarType::Int => Self::Int(0),
            ScalarType::Bool => Self::Bool(false),
        }
    }

    /// The type tag of this value.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Self::Float(_) => ScalarType::Float,
            Self::Int(_) => ScalarType::Int,
            Self::Bool(_) => ScalarType::Bool,
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Physical ordering of a column's elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Row-major: a row's components are contiguous
    /// (`index = row * components + component`).
    RowMajor,
    /// Component-major: each component is a contiguous block of
    /// `capacity` rows (`index = component * capacity + row`).
    ComponentMajor,
}

/// Classification of a field's per-row element shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldShape {
    /// One element per row.
    Scalar,
    /// A fixed-length vector, declared as `[len]`.
    Array {
        /// Number of components.
        len: u32,
    },
    /// A `1 x len` row vector.
    RowVector {
        /// Number of components.
        len: u32,
    },
    /// A `len x 1` column vector, stored component-major.
    ColVector {
        /// Number of components.
        len: u32,
    },
    /// A row-major `rows x cols` matrix.
    Matrix {
        /// Matrix rows.
        rows: u32,
        /// Matrix columns.
        cols: u32,
    },
    /// A row-major tensor of rank three or more.
    Tensor {
        /// Declared dimensions, outermost first.
        dims: ShapeDims,
    },
}

impl FieldShape {
    /// Classify declared element dimensions into a shape.
    ///
    /// `[1]` is a scalar, `[k]` an array, `[1, k]` a row vector, `[k, 1]`
    /// a column vector, any other rank-2 shape a matrix and anything of
    /// rank three or more a tensor. A rank-0 shape or a zero dimension is
    /// rejected.
    pub fn classify(dims: &[u32]) -> Result<Self, ConfigError> {
        if dims.is_empty() || dims.contains(&0) {
            return Err(ConfigError::UnsupportedShape {
                field: String::new(),
                dims: dims.to_vec(),
            });
        }
        let shape = match *dims {
            [1] => Self::Scalar,
            [len] => Self::Array { len },
            [1, len] if len > 1 => Self::RowVector { len },
            [len, 1] if len > 1 => Self::ColVector { len },
            [rows, cols] => Self::Matrix { rows, cols },
            _ => Self::Tensor {
                dims: SmallVec::from_slice(dims),
            },
        };
        Ok(shape)
    }

    /// The declared element dimensions this shape was classified from.
    pub fn dims(&self) -> ShapeDims {
        match self {
            Self::Scalar => smallvec![1],
            Self::Array { len } => smallvec![*len],
            Self::RowVector { len } => smallvec![1, *len],
            Self::ColVector { len } => smallvec![*len, 1],
            Self::Matrix { rows, cols } => smallvec![*rows, *cols],
            Self::Tensor { dims } => dims.clone(),
        }
    }

    /// Number of elements one row occupies.
    pub fn components(&self) -> usize {
        self.dims().iter().map(|&d| d as usize).product()
    }

    /// How the column's elements are ordered in memory.
    pub fn layout(&self) -> Layout {
        match self {
            Self::ColVector { .. } => Layout::ComponentMajor,
            _ => Layout::RowMajor,
        }
    }

    /// Physical column shape for a row capacity of `capacity`.
    ///
    /// The capacity is the leading dimension for every shape except the
    /// column vector, whose capacity is the trailing dimension.
    pub fn physical_shape(&self, capacity: usize) -> SmallVec<[usize; 4]> {
        match self {
            Self::Scalar => smallvec![capacity],
            Self::Array { len } | Self::RowVector { len } => smallvec![capacity, *len as usize],
            Self::ColVector { len } => smallvec![*len as usize, capacity],
            Self::Matrix { rows, cols } => {
                smallvec![capacity, *rows as usize, *cols as usize]
            }
            Self::Tensor { dims } => {
                let mut shape = SmallVec::with_capacity(dims.len() + 1);
                shape.push(capacity);
                shape.extend(dims.iter().map(|&d| d as usize));
                shape
            }
        }
    }

    /// Check the structural invariants a hand-built shape may violate.
    fn check(&self) -> bool {
        let dims = self.dims();
        let well_formed = match self {
            Self::Tensor { dims } => dims.len() > 2,
            _ => true,
        };
        let fits = dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d as usize))
            .is_some();
        well_formed && fits && !dims.contains(&0)
    }
}

/// Definition of one column in a columnar store.
///
/// Fields are registered before (or between) row allocations. Every row
/// of a newly allocated or newly grown column starts at `fill`.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    /// Unique name within the store.
    pub name: String,
    /// Per-row element shape.
    pub shape: FieldShape,
    /// Element type.
    pub scalar: ScalarType,
    /// Initial value of every element of a new row.
    pub fill: Scalar,
}

impl FieldDef {
    /// Define a field from declared element dimensions.
    ///
    /// The fill value defaults to the zero of `scalar`.
    pub fn new(
        name: impl Into<String>,
        dims: &[u32],
        scalar: ScalarType,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let shape = FieldShape::classify(dims).map_err(|_| ConfigError::UnsupportedShape {
            field: name.clone(),
            dims: dims.to_vec(),
        })?;
        Ok(Self {
            name,
            shape,
            scalar,
            fill: Scalar::zero(scalar),
        })
    }

    /// A float scalar field filled with `0.0`.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: FieldShape::Scalar,
            scalar: ScalarType::Float,
            fill: Scalar::Float(0.0),
        }
    }

    /// A float vector field of `len` components filled with `0.0`.
    ///
    /// A length of one is a scalar.
    pub fn vector(name: impl Into<String>, len: u32) -> Self {
        let shape = if len == 1 {
            FieldShape::Scalar
        } else {
            FieldShape::Array { len }
        };
        Self {
            name: name.into(),
            shape,
            scalar: ScalarType::Float,
            fill: Scalar::Float(0.0),
        }
    }

    /// A float `rows x cols` matrix field filled with `0.0`.
    pub fn matrix(name: impl Into<String>, rows: u32, cols: u32) -> Self {
        Self {
            name: name.into(),
            shape: FieldShape::Matrix { rows, cols },
            scalar: ScalarType::Float,
            fill: Scalar::Float(0.0),
        }
    }

    /// A boolean scalar field filled with `false`.
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: FieldShape::Scalar,
            scalar: ScalarType::Bool,
            fill: Scalar::Bool(false),
        }
    }

    /// Replace the fill value.
    pub fn with_fill(mut self, fill: impl Into<Scalar>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Number of elements one row of this field occupies.
    pub fn components(&self) -> usize {
        self.shape.components()
    }

    /// Validate the definition before registration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyFieldName);
        }
        if !self.shape.check() {
            return Err(ConfigError::UnsupportedShape {
                field: self.name.clone(),
                dims: self.shape.dims().to_vec(),
            });
        }
        if self.fill.scalar_type() != self.scalar {
            return Err(ConfigError::FillTypeMismatch {
                field: self.name.clone(),
                expected: self.scalar,
                found: self.fill.scalar_type(),
            });
        }
        Ok(())
    }
}
