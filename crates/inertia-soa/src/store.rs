//! The owning columnar store.
//!
//! [`ColumnStore`] keeps one [`Column`] per registered field, all sized to
//! the same row capacity. Rows are handed out by [`take()`](ColumnStore::take);
//! when the store is full every column is reallocated in lock-step before
//! the new row is returned. Resizing is internal: callers only ever see
//! `take()`.

use std::ops::Range;

use inertia_core::{ConfigError, FieldDef, FieldId, Layout, RowId};
use log::debug;
use smallvec::SmallVec;

use crate::column::{Column, Element, RowValues};
use crate::config::StoreConfig;
use crate::descriptor::FieldTable;
use crate::error::StoreError;

/// Growable structure-of-arrays storage.
///
/// # Invariants
///
/// - Every column holds exactly `capacity * components` elements.
/// - `len <= capacity <= config.max_rows`.
/// - Row `r` of every column sits at the same logical position before and
///   after growth; only the backing allocation moves.
#[derive(Clone, Debug)]
pub struct ColumnStore {
    config: StoreConfig,
    table: FieldTable,
    columns: Vec<Column>,
    len: usize,
    capacity: usize,
    growth_count: u64,
}

impl ColumnStore {
    /// Create an empty store with no fields.
    pub fn new(config: StoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let capacity = config.initial_capacity;
        Ok(Self {
            config,
            table: FieldTable::new(),
            columns: Vec::new(),
            len: 0,
            capacity,
            growth_count: 0,
        })
    }

    /// Create a store and register `fields` in order.
    ///
    /// `FieldId(n)` corresponds to the n-th definition.
    pub fn with_fields(
        config: StoreConfig,
        fields: impl IntoIterator<Item = FieldDef>,
    ) -> Result<Self, ConfigError> {
        let mut store = Self::new(config)?;
        for def in fields {
            store.register(def)?;
        }
        Ok(store)
    }

    /// Register a new column.
    ///
    /// The column is allocated at the current capacity with every row,
    /// including rows already in use, set to the field's fill value.
    pub fn register(&mut self, def: FieldDef) -> Result<FieldId, ConfigError> {
        def.validate()?;
        if self.table.get(&def.name).is_some() {
            return Err(ConfigError::DuplicateField { name: def.name });
        }
        let column = Column::new(def, self.capacity)?;
        let id = self.table.insert(&column.def().name)?;
        debug!(
            "registered field '{}' as {id} ({:?}, {} components)",
            column.def().name,
            column.def().shape,
            column.components(),
        );
        self.columns.push(column);
        Ok(id)
    }

    /// Return the next unused row, growing every column first if full.
    ///
    /// Growth reallocates to `(capacity + 1) * 2` rows (clamped to
    /// `max_rows`), preserving all existing rows and filling new ones
    /// with each field's fill value. Any raw slice previously borrowed
    /// from the store is invalidated; row IDs are not.
    pub fn take(&mut self) -> Result<RowId, StoreError> {
        if self.len >= self.config.max_rows {
            return Err(StoreError::CapacityExceeded {
                requested: self.len + 1,
                max_rows: self.config.max_rows,
            });
        }
        if self.len == self.capacity {
            self.grow(self.config.next_capacity(self.capacity))?;
        }
        let row = u32::try_from(self.len)
            .map(RowId)
            .map_err(|_| StoreError::CapacityExceeded {
                requested: self.len + 1,
                max_rows: self.config.max_rows,
            })?;
        self.len += 1;
        Ok(row)
    }

    fn grow(&mut self, new_capacity: usize) -> Result<(), StoreError> {
        let overflow = self
            .columns
            .iter()
            .any(|c| new_capacity.checked_mul(c.components()).is_none());
        if overflow {
            return Err(StoreError::CapacityExceeded {
                requested: new_capacity,
                max_rows: self.config.max_rows,
            });
        }
        let old_capacity = self.capacity;
        for column in &mut self.columns {
            column.grow(old_capacity, new_capacity);
        }
        self.capacity = new_capacity;
        self.growth_count += 1;
        debug!(
            "column store grew from {old_capacity} to {new_capacity} rows across {} columns",
            self.columns.len(),
        );
        Ok(())
    }

    /// Number of rows in use.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no rows have been taken.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated rows.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of reallocations performed so far.
    pub fn growth_count(&self) -> u64 {
        self.growth_count
    }

    /// The store's configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of registered fields.
    pub fn field_count(&self) -> usize {
        self.columns.len()
    }

    /// Resolve a field name.
    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.table.get(name)
    }

    /// The definition of a registered field.
    pub fn field(&self, field: FieldId) -> Option<&FieldDef> {
        self.columns.get(field.index()).map(Column::def)
    }

    /// Iterate over `(id, definition)` pairs in registration order.
    pub fn fields(&self) -> impl Iterator<Item = (FieldId, &FieldDef)> {
        self.table
            .iter()
            .map(move |(_, id)| (id, self.columns[id.index()].def()))
    }

    /// Look up a column.
    pub fn column(&self, field: FieldId) -> Result<&Column, StoreError> {
        self.columns
            .get(field.index())
            .ok_or(StoreError::UnknownField { field })
    }

    fn column_mut(&mut self, field: FieldId) -> Result<&mut Column, StoreError> {
        self.columns
            .get_mut(field.index())
            .ok_or(StoreError::UnknownField { field })
    }

    /// Current physical shape of a column.
    pub fn physical_shape(&self, field: FieldId) -> Result<SmallVec<[usize; 4]>, StoreError> {
        let column = self.column(field)?;
        Ok(column.def().shape.physical_shape(self.capacity))
    }

    /// Raw typed slice over a column's full capacity.
    ///
    /// The slice is in physical order (see [`Layout`]) and covers unused
    /// rows too.
    pub fn raw<T: Element>(&self, field: FieldId) -> Result<&[T], StoreError> {
        let column = self.column(field)?;
        column.check_type::<T>(field)?;
        column.typed::<T>().ok_or(StoreError::TypeMismatch {
            field,
            stored: column.def().scalar,
            requested: T::SCALAR,
        })
    }

    /// Mutable raw typed slice over a column's full capacity.
    pub fn raw_mut<T: Element>(&mut self, field: FieldId) -> Result<&mut [T], StoreError> {
        let column = self.column_mut(field)?;
        column.check_type::<T>(field)?;
        let stored = column.def().scalar;
        column.typed_mut::<T>().ok_or(StoreError::TypeMismatch {
            field,
            stored,
            requested: T::SCALAR,
        })
    }

    /// Mutable raw slices over several distinct columns at once.
    ///
    /// Fails with [`StoreError::ShapeMismatch`] if the same field appears
    /// twice.
    pub fn raw_many_mut<T: Element, const N: usize>(
        &mut self,
        fields: [FieldId; N],
    ) -> Result<[&mut [T]; N], StoreError> {
        for (i, field) in fields.iter().enumerate() {
            let column = self.column(*field)?;
            column.check_type::<T>(*field)?;
            if fields[..i].contains(field) {
                return Err(StoreError::ShapeMismatch {
                    reason: format!("field {field} borrowed mutably twice"),
                });
            }
        }
        let indices = fields.map(FieldId::index);
        let columns = self
            .columns
            .get_disjoint_mut(indices)
            .map_err(|e| StoreError::ShapeMismatch {
                reason: e.to_string(),
            })?;
        let mut out = Vec::with_capacity(N);
        for (column, field) in columns.into_iter().zip(fields) {
            let stored = column.def().scalar;
            let slice = column.typed_mut::<T>().ok_or(StoreError::TypeMismatch {
                field,
                stored,
                requested: T::SCALAR,
            })?;
            out.push(slice);
        }
        out.try_into().map_err(|_| StoreError::ShapeMismatch {
            reason: "column count changed while borrowing".to_string(),
        })
    }

    fn check_row(&self, row: RowId) -> Result<(), StoreError> {
        if row.index() < self.len {
            Ok(())
        } else {
            Err(StoreError::RowOutOfRange { row, len: self.len })
        }
    }

    /// Check that `rows` lies within the occupied rows.
    pub fn check_rows(&self, rows: &Range<usize>) -> Result<(), StoreError> {
        if rows.start <= rows.end && rows.end <= self.len {
            Ok(())
        } else {
            Err(StoreError::ShapeMismatch {
                reason: format!(
                    "row range {}..{} outside occupied rows 0..{}",
                    rows.start, rows.end, self.len
                ),
            })
        }
    }

    /// Copy one row's elements out, in logical component order.
    pub fn read_row<T: Element>(
        &self,
        field: FieldId,
        row: RowId,
    ) -> Result<RowValues<T>, StoreError> {
        self.check_row(row)?;
        let column = self.column(field)?;
        let data = self.raw::<T>(field)?;
        let values = (0..column.components())
            .map(|c| data[column.index(row.index(), c, self.capacity)])
            .collect();
        Ok(values)
    }

    /// Overwrite one row's elements, given in logical component order.
    pub fn write_row<T: Element>(
        &mut self,
        field: FieldId,
        row: RowId,
        values: &[T],
    ) -> Result<(), StoreError> {
        self.check_row(row)?;
        let capacity = self.capacity;
        let column = self.column(field)?;
        let components = column.components();
        if values.len() != components {
            return Err(StoreError::LengthMismatch {
                field,
                expected: components,
                found: values.len(),
            });
        }
        let indices: RowValues<usize> = (0..components)
            .map(|c| column.index(row.index(), c, capacity))
            .collect();
        let data = self.raw_mut::<T>(field)?;
        for (&i, &v) in indices.iter().zip(values) {
            data[i] = v;
        }
        Ok(())
    }

    fn element_index(
        &self,
        field: FieldId,
        row: RowId,
        component: usize,
    ) -> Result<usize, StoreError> {
        self.check_row(row)?;
        let column = self.column(field)?;
        if component >= column.components() {
            return Err(StoreError::ComponentOutOfRange {
                field,
                component,
                components: column.components(),
            });
        }
        Ok(column.index(row.index(), component, self.capacity))
    }

    /// Read a single element.
    pub fn element<T: Element>(
        &self,
        field: FieldId,
        row: RowId,
        component: usize,
    ) -> Result<T, StoreError> {
        let i = self.element_index(field, row, component)?;
        Ok(self.raw::<T>(field)?[i])
    }

    /// Overwrite a single element.
    pub fn set_element<T: Element>(
        &mut self,
        field: FieldId,
        row: RowId,
        component: usize,
        value: T,
    ) -> Result<(), StoreError> {
        let i = self.element_index(field, row, component)?;
        self.raw_mut::<T>(field)?[i] = value;
        Ok(())
    }

    /// Whether a column stores its rows contiguously.
    pub fn is_row_major(&self, field: FieldId) -> Result<bool, StoreError> {
        Ok(self.column(field)?.layout() == Layout::RowMajor)
    }

    /// Memory usage of all columns in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.columns.iter().map(Column::memory_bytes).sum()
    }
}
